use std::path::PathBuf;

use clap::Subcommand;
use blyx_core::notes::export_file_name;
use blyx_core::{Clock, Config, SystemClock};

use crate::common::{open_store, CliResult};

#[derive(Subcommand)]
pub enum NotesAction {
    /// Print the notebook
    Show,
    /// Replace the notebook contents
    Set {
        #[arg(required = true, trailing_var_arg = true)]
        text: Vec<String>,
    },
    /// Clear the notebook
    Clear,
    /// Write the notebook to blyx-notes-<date>.txt
    Export {
        /// Target directory (defaults to the current directory)
        #[arg(long)]
        dir: Option<PathBuf>,
    },
}

pub fn run(action: NotesAction, config: &Config) -> CliResult {
    let store = open_store(config)?;

    match action {
        NotesAction::Show => {
            let state = store.snapshot();
            if state.notes.is_empty() {
                println!("(empty)");
            } else {
                println!("{}", state.notes);
            }
        }
        NotesAction::Set { text } => {
            store.set_notes(text.join(" "));
            println!("Saved");
        }
        NotesAction::Clear => {
            store.set_notes("");
            println!("Cleared");
        }
        NotesAction::Export { dir } => {
            let clock = SystemClock;
            let file_name = export_file_name(clock.local_date(clock.now()));
            let path = dir.unwrap_or_else(|| PathBuf::from(".")).join(file_name);
            std::fs::write(&path, &store.snapshot().notes)?;
            println!("{}", path.display());
        }
    }
    Ok(())
}
