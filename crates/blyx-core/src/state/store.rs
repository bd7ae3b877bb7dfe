//! Single source of truth for application state.
//!
//! The store owns the state tree, fans out change notifications and writes
//! the tree to a durable key-value backend. It is a cheap-to-clone handle for
//! one thread; all mutation is synchronous.
//!
//! ## Mutation path
//!
//! ```text
//! updater(snapshot) -> patch -> merge -> mark dirty -> notify -> (outermost scope ends) -> persist
//! ```
//!
//! Listeners run synchronously in subscription order and all see the same
//! post-mutation snapshot. A listener that fails or panics is logged and the
//! rest still run. A listener may mutate the store again; the nested
//! mutation notifies everyone on its own and shares the outer persistence
//! scope. The outer round stops at that point, so every listener's last
//! call carries the latest snapshot.

use std::cell::{Cell, RefCell};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::rc::{Rc, Weak};

use super::model::{
    AppState, ChatMessage, ForestEntry, Session, Settings, Stats, Weather, CHAT_CAPACITY,
    FOREST_CAPACITY,
};
use super::patch::{SessionPatch, SettingsPatch, Slice, StatsPatch, WeatherPatch};
use super::persist::{encode_state, load_state, LoadOutcome, DEFAULT_STORAGE_KEY};
use crate::error::ListenerError;
use crate::storage::{KeyValueStore, MemoryKv};

type Listener = dyn Fn(&AppState) -> Result<(), ListenerError>;

struct StoreInner {
    state: RefCell<Rc<AppState>>,
    listeners: RefCell<Vec<(u64, Rc<Listener>)>>,
    next_listener_id: Cell<u64>,
    backend: Box<dyn KeyValueStore>,
    key: String,
    /// Nesting depth of open mutation/batch scopes.
    depth: Cell<u32>,
    dirty: Cell<bool>,
    writes: Cell<u64>,
    /// Bumped on every mutation.
    revision: Cell<u64>,
}

/// Handle to the shared state store.
#[derive(Clone)]
pub struct Store {
    inner: Rc<StoreInner>,
}

/// Returned by [`Store::subscribe`]; call [`Subscription::unsubscribe`] to
/// stop receiving notifications. Dropping it keeps the listener registered.
pub struct Subscription {
    id: u64,
    store: Weak<StoreInner>,
}

impl Subscription {
    pub fn unsubscribe(self) {
        if let Some(inner) = self.store.upgrade() {
            inner.listeners.borrow_mut().retain(|(id, _)| *id != self.id);
        }
    }
}

/// Closes a mutation scope even if the mutation unwinds.
struct Scope<'a>(&'a Store);

impl Drop for Scope<'_> {
    fn drop(&mut self) {
        let inner = &self.0.inner;
        let depth = inner.depth.get().saturating_sub(1);
        inner.depth.set(depth);
        if depth == 0 {
            self.0.flush();
        }
    }
}

impl Store {
    /// Open a store over `backend`, restoring whatever is stored under `key`.
    pub fn open(backend: Box<dyn KeyValueStore>, key: impl Into<String>) -> (Self, LoadOutcome) {
        let key = key.into();
        let (state, outcome) = load_state(backend.as_ref(), &key);
        let store = Self {
            inner: Rc::new(StoreInner {
                state: RefCell::new(Rc::new(state)),
                listeners: RefCell::new(Vec::new()),
                next_listener_id: Cell::new(0),
                backend,
                key,
                depth: Cell::new(0),
                dirty: Cell::new(false),
                writes: Cell::new(0),
                revision: Cell::new(0),
            }),
        };
        (store, outcome)
    }

    /// A store over a fresh in-memory backend.
    pub fn in_memory() -> Self {
        Self::open(Box::new(MemoryKv::new()), DEFAULT_STORAGE_KEY).0
    }

    // ── Queries ──────────────────────────────────────────────────────

    /// Current full state. The snapshot is immutable; later mutations do
    /// not affect it.
    pub fn snapshot(&self) -> Rc<AppState> {
        Rc::clone(&self.inner.state.borrow())
    }

    pub fn listener_count(&self) -> usize {
        self.inner.listeners.borrow().len()
    }

    /// Number of successful writes to the backend.
    pub fn writes(&self) -> u64 {
        self.inner.writes.get()
    }

    pub fn is_dirty(&self) -> bool {
        self.inner.dirty.get()
    }

    // ── Subscription ─────────────────────────────────────────────────

    /// Register a listener invoked with the snapshot after every mutation.
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&AppState) -> Result<(), ListenerError> + 'static,
    {
        let id = self.inner.next_listener_id.get();
        self.inner.next_listener_id.set(id + 1);
        self.inner
            .listeners
            .borrow_mut()
            .push((id, Rc::new(listener)));
        Subscription {
            id,
            store: Rc::downgrade(&self.inner),
        }
    }

    // ── Mutation ─────────────────────────────────────────────────────

    /// Merge the updater's patch into slice `S`, then notify and persist.
    pub fn update_slice<S, F>(&self, updater: F)
    where
        S: Slice,
        F: FnOnce(&S) -> S::Patch,
    {
        let current = self.snapshot();
        let patch = updater(S::of(&current));
        drop(current);
        tracing::trace!(slice = S::NAME, "updating slice");
        self.mutate(|state| S::of_mut(state).merge(patch));
    }

    pub fn update_session<F: FnOnce(&Session) -> SessionPatch>(&self, updater: F) {
        self.update_slice::<Session, _>(updater);
    }

    pub fn update_stats<F: FnOnce(&Stats) -> StatsPatch>(&self, updater: F) {
        self.update_slice::<Stats, _>(updater);
    }

    pub fn update_settings<F: FnOnce(&Settings) -> SettingsPatch>(&self, updater: F) {
        self.update_slice::<Settings, _>(updater);
    }

    pub fn set_weather(&self, patch: WeatherPatch) {
        self.update_slice::<Weather, _>(|_| patch);
    }

    pub fn set_notes(&self, text: impl Into<String>) {
        let text = text.into();
        self.mutate(|state| state.notes = text);
    }

    /// Append to the chat log, dropping the oldest past the cap.
    pub fn append_chat_message(&self, message: ChatMessage) {
        self.mutate(|state| {
            let messages = &mut state.chat.messages;
            messages.push(message);
            let excess = messages.len().saturating_sub(CHAT_CAPACITY);
            messages.drain(..excess);
        });
    }

    pub fn replace_chat_messages(&self, mut messages: Vec<ChatMessage>) {
        let excess = messages.len().saturating_sub(CHAT_CAPACITY);
        messages.drain(..excess);
        self.mutate(|state| state.chat.messages = messages);
    }

    /// Replace the forest; `entries` must be most-recent-first and are
    /// truncated to the cap.
    pub fn replace_forest(&self, mut entries: Vec<ForestEntry>) {
        entries.truncate(FOREST_CAPACITY);
        self.mutate(|state| state.forest = entries);
    }

    /// Restore every slice to its default, including cumulative stats.
    pub fn reset(&self) {
        tracing::info!("resetting application state");
        self.mutate(|state| *state = AppState::default());
    }

    /// Run several mutations under one persistence scope so the burst is
    /// written once.
    pub fn batch<R>(&self, f: impl FnOnce(&Store) -> R) -> R {
        let _scope = self.enter();
        f(self)
    }

    /// Write the state now if a mutation is pending. Failures are logged and
    /// leave the store dirty so the next mutation retries.
    pub fn flush(&self) {
        let inner = &self.inner;
        if !inner.dirty.get() {
            return;
        }
        inner.dirty.set(false);

        let snapshot = self.snapshot();
        let payload = match encode_state(&snapshot) {
            Ok(payload) => payload,
            Err(e) => {
                tracing::warn!(error = %e, "failed to serialize state");
                inner.dirty.set(true);
                return;
            }
        };
        match inner.backend.set(&inner.key, &payload) {
            Ok(()) => {
                inner.writes.set(inner.writes.get() + 1);
                tracing::trace!(key = %inner.key, bytes = payload.len(), "state persisted");
            }
            Err(e) => {
                tracing::warn!(key = %inner.key, error = %e, "failed to persist state");
                inner.dirty.set(true);
            }
        }
    }

    fn enter(&self) -> Scope<'_> {
        self.inner.depth.set(self.inner.depth.get() + 1);
        Scope(self)
    }

    fn mutate(&self, f: impl FnOnce(&mut AppState)) {
        let _scope = self.enter();
        {
            let mut state = self.inner.state.borrow_mut();
            f(Rc::make_mut(&mut state));
        }
        self.inner.dirty.set(true);
        self.inner.revision.set(self.inner.revision.get() + 1);
        self.notify();
    }

    fn notify(&self) {
        let revision = self.inner.revision.get();
        let snapshot = self.snapshot();
        let listeners: Vec<(u64, Rc<Listener>)> = self.inner.listeners.borrow().clone();
        for (id, listener) in listeners {
            // A listener mutated the store; that round already reached everyone.
            if self.inner.revision.get() != revision {
                break;
            }
            match catch_unwind(AssertUnwindSafe(|| listener(&snapshot))) {
                Ok(Ok(())) => {}
                Ok(Err(e)) => tracing::error!(listener = id, error = %e, "state listener failed"),
                Err(_) => tracing::error!(listener = id, "state listener panicked"),
            }
        }
    }
}
