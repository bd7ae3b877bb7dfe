use clap::{ArgAction, Subcommand};
use blyx_core::state::{SettingsPatch, Theme};
use blyx_core::Config;

use crate::common::{open_store, print_json, CliResult};

#[derive(Subcommand)]
pub enum SettingsAction {
    /// Print all settings as JSON
    Show,
    /// Set the color theme (forest, dawn, midnight, ember, glacier)
    Theme { name: String },
    /// Toggle reduced motion
    ReducedMotion {
        #[arg(action = ArgAction::Set)]
        enabled: bool,
    },
    /// Toggle the dyslexia-friendly font
    DyslexiaFont {
        #[arg(action = ArgAction::Set)]
        enabled: bool,
    },
    /// Toggle the quote ticker
    Quotes {
        #[arg(action = ArgAction::Set)]
        enabled: bool,
    },
}

pub fn run(action: SettingsAction, config: &Config) -> CliResult {
    let store = open_store(config)?;

    let patch = match action {
        SettingsAction::Show => None,
        SettingsAction::Theme { name } => Some(SettingsPatch {
            theme: Some(name.parse::<Theme>()?),
            ..Default::default()
        }),
        SettingsAction::ReducedMotion { enabled } => Some(SettingsPatch {
            reduced_motion: Some(enabled),
            ..Default::default()
        }),
        SettingsAction::DyslexiaFont { enabled } => Some(SettingsPatch {
            dyslexia_font: Some(enabled),
            ..Default::default()
        }),
        SettingsAction::Quotes { enabled } => Some(SettingsPatch {
            show_quotes: Some(enabled),
            ..Default::default()
        }),
    };

    if let Some(patch) = patch {
        store.update_settings(|_| patch);
    }
    print_json(&store.snapshot().settings)?;
    Ok(())
}
