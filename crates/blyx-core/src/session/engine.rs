//! Focus session engine.
//!
//! A countdown state machine over the store's `session` slice. It holds no
//! copy of the state: every command reads a snapshot and writes back through
//! the store. The caller drives time by invoking `tick()` once per ticker
//! period while [`Ticker::is_active`] is true.
//!
//! ## State Transitions
//!
//! ```text
//! Idle|Completed|Failed --start--> Running <--pause/resume--> Paused
//! Running --tick to zero--> Completed
//! Running|Paused --abort--> Failed
//! ```
//!
//! Ticks are counted, not measured: a session rehydrated after a restart
//! resumes from its persisted `remaining_seconds` regardless of how much
//! wall-clock time passed while the process was down.

use crate::events::Event;
use crate::state::{
    EntryStatus, ForestEntry, SessionPatch, SessionStatus, StatsPatch, Store, TreeStage,
    FOREST_CAPACITY,
};

use super::clock::{Clock, SystemClock};
use super::rules::{
    clamp_minutes, coins_for, compute_streak, elapsed_minutes, normalize_daily, progress_percent,
    session_progress, tree_stage_for,
};
use super::ticker::Ticker;

pub struct SessionEngine<C: Clock = SystemClock> {
    store: Store,
    ticker: Ticker,
    clock: C,
}

impl SessionEngine<SystemClock> {
    pub fn new(store: Store) -> Self {
        Self::with_clock(store, SystemClock)
    }
}

impl<C: Clock> SessionEngine<C> {
    pub fn with_clock(store: Store, clock: C) -> Self {
        Self {
            store,
            ticker: Ticker::default(),
            clock,
        }
    }

    /// Replace the tick handle, e.g. to change its period. Any active
    /// schedule on the old handle is dropped.
    pub fn with_ticker(mut self, ticker: Ticker) -> Self {
        self.ticker = ticker;
        self
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn ticker(&self) -> &Ticker {
        &self.ticker
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn status(&self) -> SessionStatus {
        self.store.snapshot().session.status
    }

    pub fn snapshot(&self) -> Event {
        let state = self.store.snapshot();
        Event::StateSnapshot {
            session: state.session.clone(),
            progress: session_progress(&state.session),
            at: self.clock.now(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Plant a new session, overwriting whatever the slice held.
    pub fn start(&mut self, minutes: i64) -> Option<Event> {
        let planned = clamp_minutes(minutes);
        let remaining = planned * 60;
        let now = self.clock.now();

        self.store.update_session(|_| SessionPatch {
            status: Some(SessionStatus::Running),
            planned_minutes: Some(planned),
            remaining_seconds: Some(remaining),
            started_at: Some(Some(now)),
            paused_at: Some(None),
            coins_earned: Some(0),
            tree_stage: Some(TreeStage::Seedling),
        });
        self.ticker.ensure();
        tracing::info!(planned_minutes = planned, "session started");

        Some(Event::SessionStarted {
            planned_minutes: planned,
            remaining_seconds: remaining,
            at: now,
        })
    }

    pub fn pause(&mut self) -> Option<Event> {
        let session = self.store.snapshot().session.clone();
        if session.status != SessionStatus::Running {
            return None;
        }
        let now = self.clock.now();
        self.store.update_session(|_| SessionPatch {
            status: Some(SessionStatus::Paused),
            paused_at: Some(Some(now)),
            ..Default::default()
        });
        self.ticker.cancel();
        tracing::info!(remaining_seconds = session.remaining_seconds, "session paused");

        Some(Event::SessionPaused {
            remaining_seconds: session.remaining_seconds,
            at: now,
        })
    }

    pub fn resume(&mut self) -> Option<Event> {
        let session = self.store.snapshot().session.clone();
        if session.status != SessionStatus::Paused {
            return None;
        }
        self.store.update_session(|_| SessionPatch {
            status: Some(SessionStatus::Running),
            paused_at: Some(None),
            ..Default::default()
        });
        self.ticker.ensure();
        tracing::info!(remaining_seconds = session.remaining_seconds, "session resumed");

        Some(Event::SessionResumed {
            remaining_seconds: session.remaining_seconds,
            at: self.clock.now(),
        })
    }

    /// Give up on a running or paused session; the tree withers.
    pub fn abort(&mut self) -> Option<Event> {
        match self.status() {
            SessionStatus::Running | SessionStatus::Paused => Some(self.handle_failure()),
            _ => None,
        }
    }

    /// Advance the countdown by one tick.
    ///
    /// Returns `StageChanged` when the tree grows into a new stage and
    /// `SessionCompleted` when the countdown reaches zero.
    pub fn tick(&mut self) -> Option<Event> {
        let session = self.store.snapshot().session.clone();
        if session.status != SessionStatus::Running {
            self.ticker.cancel();
            return None;
        }

        let remaining = session.remaining_seconds.saturating_sub(1);
        if remaining == 0 {
            return Some(self.handle_completion());
        }

        let progress = progress_percent(remaining, session.planned_minutes);
        let stage = tree_stage_for(progress);
        self.store.update_session(|_| SessionPatch {
            remaining_seconds: Some(remaining),
            tree_stage: Some(stage),
            ..Default::default()
        });
        tracing::trace!(remaining_seconds = remaining, progress, "tick");

        (stage != session.tree_stage).then(|| Event::StageChanged {
            stage,
            progress,
            at: self.clock.now(),
        })
    }

    /// Resume ticking for a session persisted as running. Returns whether
    /// a tick schedule is now active.
    pub fn hydrate(&mut self) -> bool {
        if self.status() == SessionStatus::Running {
            self.ticker.ensure();
            tracing::info!("rehydrated running session");
        }
        self.ticker.is_active()
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn handle_completion(&mut self) -> Event {
        self.ticker.cancel();
        let now = self.clock.now();
        let today = self.clock.local_date(now);
        let state = self.store.snapshot();

        let minutes = state.session.planned_minutes;
        let coins = coins_for(minutes);
        let last_day = state
            .stats
            .last_completion
            .map(|at| self.clock.local_date(at));
        let (daily_minutes, sessions) = normalize_daily(&state.stats, last_day, today);
        let streak = compute_streak(last_day, today, state.stats.streak);
        let forest = prepend(
            ForestEntry::new(now, minutes, EntryStatus::Completed, TreeStage::Flourishing),
            &state.forest,
        );
        let total_coins = state.stats.coins + u64::from(coins);
        drop(state);

        self.store.batch(|store| {
            store.update_stats(|_| StatsPatch {
                daily_focus_minutes: Some(daily_minutes + minutes),
                sessions_completed: Some(sessions + 1),
                coins: Some(total_coins),
                streak: Some(streak),
                last_completion: Some(Some(now)),
            });
            store.replace_forest(forest);
            store.update_session(|_| SessionPatch {
                status: Some(SessionStatus::Completed),
                remaining_seconds: Some(0),
                coins_earned: Some(coins),
                tree_stage: Some(TreeStage::Flourishing),
                ..Default::default()
            });
        });
        tracing::info!(planned_minutes = minutes, coins, streak, "session completed");

        Event::SessionCompleted {
            planned_minutes: minutes,
            coins_earned: coins,
            streak,
            at: now,
        }
    }

    fn handle_failure(&mut self) -> Event {
        self.ticker.cancel();
        let now = self.clock.now();
        let state = self.store.snapshot();

        let remaining = state.session.remaining_seconds;
        let elapsed = elapsed_minutes(state.session.planned_minutes, remaining);
        let forest = prepend(
            ForestEntry::new(now, elapsed, EntryStatus::Failed, TreeStage::Withered),
            &state.forest,
        );
        drop(state);

        self.store.batch(|store| {
            store.replace_forest(forest);
            store.update_session(|_| SessionPatch {
                status: Some(SessionStatus::Failed),
                tree_stage: Some(TreeStage::Withered),
                ..Default::default()
            });
        });
        tracing::info!(elapsed_minutes = elapsed, "session failed");

        Event::SessionFailed {
            elapsed_minutes: elapsed,
            remaining_seconds: remaining,
            at: now,
        }
    }
}

fn prepend(entry: ForestEntry, forest: &[ForestEntry]) -> Vec<ForestEntry> {
    std::iter::once(entry)
        .chain(forest.iter().take(FOREST_CAPACITY - 1).cloned())
        .collect()
}
