//! # Blyx Core Library
//!
//! Core logic for the Blyx focus widget: a gamified focus timer that grows a
//! tree while the user concentrates. The `blyx` CLI is a thin rendering and
//! driver layer over this crate.
//!
//! ## Architecture
//!
//! - **State Store**: single source of truth for session, stats, forest,
//!   settings, notes, weather and chat. Snapshots are immutable and every
//!   effective mutation notifies subscribers and is persisted to a durable
//!   key-value store.
//! - **Session Engine**: a tick-driven state machine (`idle`, `running`,
//!   `paused`, `completed`, `failed`) that requires the caller to invoke
//!   `tick()` once per second while its ticker is active.
//! - **Storage**: SQLite-backed key-value persistence and TOML configuration.
//! - **Collaborators**: canned chat replies, extractive summarizer,
//!   calculator, rotating quotes and an Open-Meteo weather client.
//!
//! ## Key Components
//!
//! - [`Store`]: observable application state
//! - [`SessionEngine`]: focus session state machine
//! - [`Config`]: application configuration management
//! - [`KeyValueStore`]: durable storage seam

pub mod calculator;
pub mod chat;
pub mod error;
pub mod events;
pub mod notes;
pub mod quotes;
pub mod session;
pub mod state;
pub mod storage;
pub mod summarizer;
pub mod weather;

pub use error::{CalcError, ConfigError, CoreError, ListenerError, Result, StorageError, WeatherError};
pub use events::Event;
pub use session::{Clock, ManualClock, SessionEngine, SystemClock, Ticker};
pub use state::{AppState, LoadOutcome, Session, SessionStatus, Store, Subscription, TreeStage};
pub use storage::{Config, KeyValueStore, MemoryKv, SqliteKv};
pub use weather::{WeatherClient, WeatherReport};
