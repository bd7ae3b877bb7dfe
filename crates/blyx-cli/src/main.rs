use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod commands;
mod common;
mod render;

use blyx_core::Config;

#[derive(Parser)]
#[command(name = "blyx", version, about = "Blyx focus timer")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the live session loop (reads commands from stdin)
    Run,
    /// Focus session control
    Session {
        #[command(subcommand)]
        action: commands::session::SessionAction,
    },
    /// Cumulative statistics
    Stats,
    /// Recently grown and withered trees
    Forest {
        /// Number of entries to show
        #[arg(long, default_value = "9")]
        limit: usize,
        /// Print entries as JSON
        #[arg(long)]
        json: bool,
    },
    /// Display preferences
    Settings {
        #[command(subcommand)]
        action: commands::settings::SettingsAction,
    },
    /// Notebook
    Notes {
        #[command(subcommand)]
        action: commands::notes::NotesAction,
    },
    /// Ask the focus helper
    Chat {
        /// Message text
        #[arg(required = true, trailing_var_arg = true)]
        message: Vec<String>,
    },
    /// Summarize text into a few bullet points (defaults to the notebook)
    Summarize {
        /// Text to summarize
        text: Option<String>,
        /// Read the text from a file
        #[arg(long, conflicts_with = "text")]
        file: Option<PathBuf>,
    },
    /// Evaluate an arithmetic expression
    Calc {
        /// Expression, e.g. "(25 * 4) / 60"
        #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
        expr: Vec<String>,
    },
    /// Current weather for a ZIP code (defaults to the saved one)
    Weather {
        zip: Option<String>,
        /// Ignore the cached lookup
        #[arg(long)]
        refresh: bool,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Restore all state to defaults, including coins and streak
    Reset,
}

/// Initialize tracing with a filter from `BLYX_LOG`, logging to stderr.
fn init_tracing() {
    let env_filter = EnvFilter::try_from_env("BLYX_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() {
    init_tracing();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Config { action } => commands::config::run(action),
        Commands::Run => commands::run::run(&Config::load_or_default()),
        Commands::Session { action } => commands::session::run(action, &Config::load_or_default()),
        Commands::Stats => commands::stats::run(&Config::load_or_default()),
        Commands::Forest { limit, json } => {
            commands::stats::forest(&Config::load_or_default(), limit, json)
        }
        Commands::Settings { action } => {
            commands::settings::run(action, &Config::load_or_default())
        }
        Commands::Notes { action } => commands::notes::run(action, &Config::load_or_default()),
        Commands::Chat { message } => {
            commands::chat::run(&message.join(" "), &Config::load_or_default())
        }
        Commands::Summarize { text, file } => {
            commands::summarize::run(text, file, &Config::load_or_default())
        }
        Commands::Calc { expr } => commands::calc::run(&expr.join(" ")),
        Commands::Weather { zip, refresh } => {
            commands::weather::run(zip, refresh, &Config::load_or_default())
        }
        Commands::Reset => commands::reset::run(&Config::load_or_default()),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
