mod clock;
mod engine;
pub mod rules;
mod ticker;

pub use clock::{Clock, ManualClock, SystemClock};
pub use engine::SessionEngine;
pub use ticker::Ticker;
