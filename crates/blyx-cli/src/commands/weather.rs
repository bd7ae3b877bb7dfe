use blyx_core::{Config, WeatherClient};
use chrono::Utc;

use crate::common::{open_store, CliResult};
use crate::render::weather_line;

/// Print the weather for `zip` (or the saved ZIP), fetching when the cache
/// is stale, the ZIP changed, or `refresh` is set.
pub fn run(zip: Option<String>, refresh: bool, config: &Config) -> CliResult {
    let store = open_store(config)?;
    let cached = store.snapshot().weather.clone();
    let zip = zip
        .map(|z| z.trim().to_string())
        .filter(|z| !z.is_empty())
        .unwrap_or_else(|| cached.zip.clone());
    if zip.is_empty() {
        return Err("no ZIP code saved; pass one".into());
    }

    let ttl = config.weather.cache_ttl();
    let fresh = zip == cached.zip && !cached.is_stale(Utc::now(), ttl);
    if !refresh && fresh {
        if let Some(line) = weather_line(&cached) {
            println!("{line}");
            return Ok(());
        }
    }

    let client = WeatherClient::new(&config.weather);
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    let report = runtime.block_on(client.fetch(&zip))?;

    store.set_weather(report.into_patch(&zip, Utc::now()));
    if let Some(line) = weather_line(&store.snapshot().weather) {
        println!("{line}");
    }
    Ok(())
}
