use blyx_core::Config;

use crate::common::{open_store, CliResult};

pub fn run(config: &Config) -> CliResult {
    let store = open_store(config)?;
    store.reset();
    println!("state reset to defaults");
    Ok(())
}
