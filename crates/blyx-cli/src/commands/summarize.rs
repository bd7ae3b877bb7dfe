use std::path::PathBuf;

use blyx_core::summarizer::summarize;
use blyx_core::Config;

use crate::common::{open_store, CliResult};

pub fn run(text: Option<String>, file: Option<PathBuf>, config: &Config) -> CliResult {
    let text = match (text, file) {
        (Some(text), _) => text,
        (None, Some(path)) => std::fs::read_to_string(path)?,
        (None, None) => open_store(config)?.snapshot().notes.clone(),
    };

    let bullets = summarize(&text);
    if bullets.is_empty() {
        println!("Nothing to summarize yet.");
    }
    for bullet in bullets {
        println!("- {bullet}");
    }
    Ok(())
}
