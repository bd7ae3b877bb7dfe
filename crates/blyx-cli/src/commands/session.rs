use clap::Subcommand;
use blyx_core::{Config, SessionEngine};

use crate::common::{open_store, print_json, CliResult};

#[derive(Subcommand)]
pub enum SessionAction {
    /// Print the current session as JSON
    Status,
    /// Plant a new focus session (5-180 minutes)
    Start {
        /// Duration in minutes; defaults to session.default_minutes
        #[arg(allow_hyphen_values = true)]
        minutes: Option<i64>,
    },
    /// Pause a running session
    Pause,
    /// Resume a paused session
    Resume,
    /// Give up on the current session; the tree withers
    Abort,
}

/// One-shot session commands. Nothing ticks here: a started session counts
/// down only while `blyx run` is hosting it.
pub fn run(action: SessionAction, config: &Config) -> CliResult {
    let store = open_store(config)?;
    let mut engine = SessionEngine::new(store);

    let event = match action {
        SessionAction::Status => None,
        SessionAction::Start { minutes } => {
            engine.start(minutes.unwrap_or_else(|| i64::from(config.session.default_minutes)))
        }
        SessionAction::Pause => engine.pause(),
        SessionAction::Resume => engine.resume(),
        SessionAction::Abort => engine.abort(),
    };

    match event {
        Some(event) => print_json(&event)?,
        None => print_json(&engine.snapshot())?,
    }
    Ok(())
}
