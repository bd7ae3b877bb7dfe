use blyx_core::session::rules::normalize_daily;
use blyx_core::{Clock, Config, SystemClock};

use crate::common::{open_store, print_json, CliResult};
use crate::render::forest_line;

/// Print cumulative stats, with the daily counters as they stand today.
pub fn run(config: &Config) -> CliResult {
    let store = open_store(config)?;
    let clock = SystemClock;
    let mut stats = store.snapshot().stats.clone();

    let today = clock.local_date(clock.now());
    let last_day = stats.last_completion.map(|at| clock.local_date(at));
    let (daily_minutes, sessions) = normalize_daily(&stats, last_day, today);
    stats.daily_focus_minutes = daily_minutes;
    stats.sessions_completed = sessions;

    print_json(&stats)?;
    Ok(())
}

pub fn forest(config: &Config, limit: usize, json: bool) -> CliResult {
    let store = open_store(config)?;
    let state = store.snapshot();
    let entries = &state.forest[..limit.min(state.forest.len())];

    if json {
        print_json(&entries)?;
    } else if entries.is_empty() {
        println!("Grow a tree to see it appear here.");
    } else {
        for entry in entries {
            println!("{}", forest_line(entry));
        }
    }
    Ok(())
}
