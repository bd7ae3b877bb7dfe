//! Application state tree.
//!
//! Every struct carries `#[serde(default)]` so a persisted tree written by an
//! older build deserializes with new fields backfilled from defaults.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Shortest plannable session, in minutes.
pub const MIN_SESSION_MINUTES: u32 = 5;
/// Longest plannable session, in minutes.
pub const MAX_SESSION_MINUTES: u32 = 180;
/// Planned minutes of a fresh state.
pub const DEFAULT_SESSION_MINUTES: u32 = 25;
/// Forest history cap; the oldest entries are dropped past this.
pub const FOREST_CAPACITY: usize = 50;
/// Chat ring-buffer cap.
pub const CHAT_CAPACITY: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    #[default]
    Idle,
    Running,
    Paused,
    Completed,
    Failed,
}

impl SessionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionStatus::Idle => "idle",
            SessionStatus::Running => "running",
            SessionStatus::Paused => "paused",
            SessionStatus::Completed => "completed",
            SessionStatus::Failed => "failed",
        }
    }
}

/// Gamification label derived from session progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TreeStage {
    #[default]
    Seedling,
    Sapling,
    Growing,
    Blooming,
    Flourishing,
    Withered,
}

impl TreeStage {
    pub fn label(&self) -> &'static str {
        match self {
            TreeStage::Seedling => "Seedling",
            TreeStage::Sapling => "Sapling",
            TreeStage::Growing => "Growing",
            TreeStage::Blooming => "Blooming",
            TreeStage::Flourishing => "Flourishing",
            TreeStage::Withered => "Withered",
        }
    }
}

/// The active countdown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Session {
    pub status: SessionStatus,
    pub planned_minutes: u32,
    pub remaining_seconds: u32,
    pub started_at: Option<DateTime<Utc>>,
    pub paused_at: Option<DateTime<Utc>>,
    pub coins_earned: u32,
    pub tree_stage: TreeStage,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            status: SessionStatus::Idle,
            planned_minutes: DEFAULT_SESSION_MINUTES,
            remaining_seconds: DEFAULT_SESSION_MINUTES * 60,
            started_at: None,
            paused_at: None,
            coins_earned: 0,
            tree_stage: TreeStage::Seedling,
        }
    }
}

/// Cumulative statistics across sessions.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Stats {
    pub daily_focus_minutes: u32,
    pub sessions_completed: u32,
    pub coins: u64,
    pub streak: u32,
    pub last_completion: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryStatus {
    Completed,
    Failed,
}

/// One finished or withered session in the forest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForestEntry {
    pub id: String,
    pub completed_at: DateTime<Utc>,
    /// Minutes grown (planned for completions, elapsed for failures).
    pub duration: u32,
    pub status: EntryStatus,
    pub stage: TreeStage,
}

impl ForestEntry {
    pub fn new(at: DateTime<Utc>, duration: u32, status: EntryStatus, stage: TreeStage) -> Self {
        Self {
            id: format!("{}-{}", at.to_rfc3339(), uuid::Uuid::new_v4().simple()),
            completed_at: at,
            duration,
            status,
            stage,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Forest,
    Dawn,
    Midnight,
    Ember,
    Glacier,
}

impl Theme {
    pub const ALL: [Theme; 5] = [
        Theme::Forest,
        Theme::Dawn,
        Theme::Midnight,
        Theme::Ember,
        Theme::Glacier,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Forest => "forest",
            Theme::Dawn => "dawn",
            Theme::Midnight => "midnight",
            Theme::Ember => "ember",
            Theme::Glacier => "glacier",
        }
    }
}

impl std::str::FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Theme::ALL
            .iter()
            .copied()
            .find(|theme| theme.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown theme '{s}'"))
    }
}

/// Display preferences toggled by the user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Settings {
    pub theme: Theme,
    pub reduced_motion: bool,
    pub dyslexia_font: bool,
    pub show_quotes: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            theme: Theme::Forest,
            reduced_motion: false,
            dyslexia_font: false,
            show_quotes: true,
        }
    }
}

/// Last weather lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Weather {
    pub zip: String,
    /// Epoch milliseconds of the last successful lookup, 0 if never.
    pub cached_at: i64,
    /// Degrees Fahrenheit.
    pub temperature: Option<i32>,
    pub condition: Option<String>,
}

impl Default for Weather {
    fn default() -> Self {
        Self {
            zip: "94105".to_string(),
            cached_at: 0,
            temperature: None,
            condition: None,
        }
    }
}

impl Weather {
    /// True when there is no cached lookup or it is older than `ttl`.
    pub fn is_stale(&self, now: DateTime<Utc>, ttl: chrono::Duration) -> bool {
        self.cached_at == 0 || now.timestamp_millis() - self.cached_at > ttl.num_milliseconds()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>, at: DateTime<Utc>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
            created_at: at,
        }
    }

    pub fn assistant(content: impl Into<String>, at: DateTime<Utc>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
            created_at: at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Chat {
    pub messages: Vec<ChatMessage>,
}

/// The whole application state; each field is a slice.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppState {
    pub session: Session,
    pub stats: Stats,
    /// Most recent first.
    pub forest: Vec<ForestEntry>,
    pub settings: Settings,
    pub notes: String,
    pub weather: Weather,
    pub chat: Chat,
}

impl AppState {
    /// Enforce the collection caps on data that may predate them.
    pub(crate) fn enforce_caps(&mut self) {
        self.forest.truncate(FOREST_CAPACITY);
        let excess = self.chat.messages.len().saturating_sub(CHAT_CAPACITY);
        self.chat.messages.drain(..excess);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn default_session_is_idle_25_minutes() {
        let session = Session::default();
        assert_eq!(session.status, SessionStatus::Idle);
        assert_eq!(session.remaining_seconds, 1500);
        assert_eq!(session.tree_stage, TreeStage::Seedling);
    }

    #[test]
    fn state_serializes_camel_case() {
        let json = serde_json::to_value(AppState::default()).unwrap();
        assert_eq!(json["session"]["plannedMinutes"], 25);
        assert_eq!(json["session"]["treeStage"], "Seedling");
        assert_eq!(json["stats"]["lastCompletion"], serde_json::Value::Null);
        assert_eq!(json["settings"]["theme"], "forest");
        assert_eq!(json["weather"]["zip"], "94105");
    }

    #[test]
    fn theme_parses_case_insensitively() {
        assert_eq!("Midnight".parse::<Theme>().unwrap(), Theme::Midnight);
        assert!("neon".parse::<Theme>().is_err());
    }

    #[test]
    fn weather_staleness() {
        let now = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();
        let ttl = chrono::Duration::minutes(60);
        let mut weather = Weather::default();
        assert!(weather.is_stale(now, ttl));

        weather.cached_at = (now - chrono::Duration::minutes(30)).timestamp_millis();
        assert!(!weather.is_stale(now, ttl));

        weather.cached_at = (now - chrono::Duration::minutes(61)).timestamp_millis();
        assert!(weather.is_stale(now, ttl));
    }

    #[test]
    fn enforce_caps_keeps_newest_chat_and_forest_head() {
        let at = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();
        let mut state = AppState::default();
        state.chat.messages = (0..25)
            .map(|i| ChatMessage::user(format!("m{i}"), at))
            .collect();
        state.forest = (0..60)
            .map(|i| ForestEntry::new(at, i, EntryStatus::Completed, TreeStage::Flourishing))
            .collect();

        state.enforce_caps();

        assert_eq!(state.chat.messages.len(), CHAT_CAPACITY);
        assert_eq!(state.chat.messages[0].content, "m5");
        assert_eq!(state.forest.len(), FOREST_CAPACITY);
        assert_eq!(state.forest[0].duration, 0);
    }
}
