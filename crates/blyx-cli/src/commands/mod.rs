pub mod calc;
pub mod chat;
pub mod config;
pub mod notes;
pub mod reset;
pub mod run;
pub mod session;
pub mod settings;
pub mod stats;
pub mod summarize;
pub mod weather;
