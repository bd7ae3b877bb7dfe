//! Merge patches for the record-shaped slices.
//!
//! A patch names exactly the fields its slice lets a caller set; `None`
//! leaves the current value alone. Nullable fields use `Option<Option<T>>`
//! so a patch can clear them.

use chrono::{DateTime, Utc};

use super::model::{AppState, Session, SessionStatus, Settings, Stats, Theme, TreeStage, Weather};

/// A named top-level subdivision of [`AppState`] that accepts merge patches.
pub trait Slice: Clone {
    const NAME: &'static str;
    type Patch: Default;

    fn of(state: &AppState) -> &Self;
    fn of_mut(state: &mut AppState) -> &mut Self;
    fn merge(&mut self, patch: Self::Patch);
}

fn set<T>(field: &mut T, value: Option<T>) {
    if let Some(value) = value {
        *field = value;
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionPatch {
    pub status: Option<SessionStatus>,
    pub planned_minutes: Option<u32>,
    pub remaining_seconds: Option<u32>,
    pub started_at: Option<Option<DateTime<Utc>>>,
    pub paused_at: Option<Option<DateTime<Utc>>>,
    pub coins_earned: Option<u32>,
    pub tree_stage: Option<TreeStage>,
}

impl Slice for Session {
    const NAME: &'static str = "session";
    type Patch = SessionPatch;

    fn of(state: &AppState) -> &Self {
        &state.session
    }

    fn of_mut(state: &mut AppState) -> &mut Self {
        &mut state.session
    }

    fn merge(&mut self, patch: SessionPatch) {
        set(&mut self.status, patch.status);
        set(&mut self.planned_minutes, patch.planned_minutes);
        set(&mut self.remaining_seconds, patch.remaining_seconds);
        set(&mut self.started_at, patch.started_at);
        set(&mut self.paused_at, patch.paused_at);
        set(&mut self.coins_earned, patch.coins_earned);
        set(&mut self.tree_stage, patch.tree_stage);
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatsPatch {
    pub daily_focus_minutes: Option<u32>,
    pub sessions_completed: Option<u32>,
    pub coins: Option<u64>,
    pub streak: Option<u32>,
    pub last_completion: Option<Option<DateTime<Utc>>>,
}

impl Slice for Stats {
    const NAME: &'static str = "stats";
    type Patch = StatsPatch;

    fn of(state: &AppState) -> &Self {
        &state.stats
    }

    fn of_mut(state: &mut AppState) -> &mut Self {
        &mut state.stats
    }

    fn merge(&mut self, patch: StatsPatch) {
        set(&mut self.daily_focus_minutes, patch.daily_focus_minutes);
        set(&mut self.sessions_completed, patch.sessions_completed);
        set(&mut self.coins, patch.coins);
        set(&mut self.streak, patch.streak);
        set(&mut self.last_completion, patch.last_completion);
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SettingsPatch {
    pub theme: Option<Theme>,
    pub reduced_motion: Option<bool>,
    pub dyslexia_font: Option<bool>,
    pub show_quotes: Option<bool>,
}

impl Slice for Settings {
    const NAME: &'static str = "settings";
    type Patch = SettingsPatch;

    fn of(state: &AppState) -> &Self {
        &state.settings
    }

    fn of_mut(state: &mut AppState) -> &mut Self {
        &mut state.settings
    }

    fn merge(&mut self, patch: SettingsPatch) {
        set(&mut self.theme, patch.theme);
        set(&mut self.reduced_motion, patch.reduced_motion);
        set(&mut self.dyslexia_font, patch.dyslexia_font);
        set(&mut self.show_quotes, patch.show_quotes);
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct WeatherPatch {
    pub zip: Option<String>,
    pub cached_at: Option<i64>,
    pub temperature: Option<Option<i32>>,
    pub condition: Option<Option<String>>,
}

impl Slice for Weather {
    const NAME: &'static str = "weather";
    type Patch = WeatherPatch;

    fn of(state: &AppState) -> &Self {
        &state.weather
    }

    fn of_mut(state: &mut AppState) -> &mut Self {
        &mut state.weather
    }

    fn merge(&mut self, patch: WeatherPatch) {
        set(&mut self.zip, patch.zip);
        set(&mut self.cached_at, patch.cached_at);
        set(&mut self.temperature, patch.temperature);
        set(&mut self.condition, patch.condition);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_patch_leaves_slice_untouched() {
        let mut session = Session::default();
        session.merge(SessionPatch::default());
        assert_eq!(session, Session::default());
    }

    #[test]
    fn session_patch_sets_only_named_fields() {
        let mut session = Session::default();
        session.merge(SessionPatch {
            remaining_seconds: Some(42),
            tree_stage: Some(TreeStage::Growing),
            ..Default::default()
        });
        assert_eq!(session.remaining_seconds, 42);
        assert_eq!(session.tree_stage, TreeStage::Growing);
        assert_eq!(session.planned_minutes, 25);
        assert_eq!(session.status, SessionStatus::Idle);
    }

    #[test]
    fn nullable_fields_can_be_cleared() {
        let mut session = Session {
            paused_at: Some(Utc::now()),
            ..Default::default()
        };
        session.merge(SessionPatch {
            paused_at: Some(None),
            ..Default::default()
        });
        assert!(session.paused_at.is_none());
    }

    #[test]
    fn weather_patch_merges_over_existing_zip() {
        let mut weather = Weather::default();
        weather.merge(WeatherPatch {
            temperature: Some(Some(61)),
            condition: Some(Some("Foggy".into())),
            ..Default::default()
        });
        assert_eq!(weather.zip, "94105");
        assert_eq!(weather.temperature, Some(61));
    }
}
