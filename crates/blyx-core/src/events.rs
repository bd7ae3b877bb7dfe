use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::state::{Session, TreeStage};

/// Every effective session transition produces an Event.
/// No-op commands produce none.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    SessionStarted {
        planned_minutes: u32,
        remaining_seconds: u32,
        at: DateTime<Utc>,
    },
    SessionPaused {
        remaining_seconds: u32,
        at: DateTime<Utc>,
    },
    SessionResumed {
        remaining_seconds: u32,
        at: DateTime<Utc>,
    },
    /// A tick moved the tree into a new growth stage.
    StageChanged {
        stage: TreeStage,
        progress: u32,
        at: DateTime<Utc>,
    },
    SessionCompleted {
        planned_minutes: u32,
        coins_earned: u32,
        streak: u32,
        at: DateTime<Utc>,
    },
    SessionFailed {
        elapsed_minutes: u32,
        remaining_seconds: u32,
        at: DateTime<Utc>,
    },
    StateSnapshot {
        session: Session,
        progress: u32,
        at: DateTime<Utc>,
    },
}
