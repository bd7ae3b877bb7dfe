mod model;
mod patch;
mod persist;
mod store;

pub use model::{
    AppState, Chat, ChatMessage, ChatRole, EntryStatus, ForestEntry, Session, SessionStatus,
    Settings, Stats, Theme, TreeStage, Weather, CHAT_CAPACITY, DEFAULT_SESSION_MINUTES,
    FOREST_CAPACITY, MAX_SESSION_MINUTES, MIN_SESSION_MINUTES,
};
pub use patch::{SessionPatch, SettingsPatch, Slice, StatsPatch, WeatherPatch};
pub use persist::{decode_state, encode_state, load_state, LoadOutcome, DEFAULT_STORAGE_KEY};
pub use store::{Store, Subscription};
