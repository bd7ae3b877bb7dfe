//! Live session loop.
//!
//! A single-threaded tokio runtime hosts the engine. The loop waits on the
//! tick interval, the quote interval, stdin commands, results sent back by
//! spawned tasks (weather lookups, delayed chat replies) and Ctrl-C. The
//! store is only ever touched from the loop itself; spawned tasks own no
//! state and report back over the channel.

use std::cell::Cell;
use std::time::Duration;

use blyx_core::chat::reply;
use blyx_core::quotes::{QuoteTicker, PAUSED_MESSAGE};
use blyx_core::state::{ChatMessage, SessionStatus, SettingsPatch, Store, TreeStage};
use blyx_core::{Config, Event, SessionEngine, Ticker, WeatherClient, WeatherError, WeatherReport};
use chrono::{Local, Timelike, Utc};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tokio::time::{Instant, MissedTickBehavior};

use crate::common::{open_store, CliResult};
use crate::render::{
    ambient, chat_line, clock_line, quote_line, session_line, status_message, weather_line,
};

/// A line typed at the prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Start(Option<i64>),
    Pause,
    Resume,
    Abort,
    Status,
    Chat(String),
    Weather(String),
    Note(String),
    Quotes(bool),
    Help,
    Quit,
}

/// Results delivered back to the loop by spawned tasks.
enum Inbound {
    Weather {
        zip: String,
        result: Result<WeatherReport, WeatherError>,
    },
    ChatReply(&'static str),
}

const HELP: &str = "commands: start [min] | pause | resume | abort | status | chat <text> | weather <zip> | note <text> | quotes on|off | quit";

const QUOTE_PERIOD: Duration = Duration::from_secs(15);

pub fn parse_command(line: &str) -> Result<Command, String> {
    let line = line.trim();
    let (verb, rest) = match line.split_once(char::is_whitespace) {
        Some((verb, rest)) => (verb, rest.trim()),
        None => (line, ""),
    };
    let required = |what: &str| {
        if rest.is_empty() {
            Err(format!("{verb} needs {what}"))
        } else {
            Ok(rest.to_string())
        }
    };

    match verb.to_ascii_lowercase().as_str() {
        "start" if rest.is_empty() => Ok(Command::Start(None)),
        "start" => rest
            .parse::<i64>()
            .map(|m| Command::Start(Some(m)))
            .map_err(|_| format!("'{rest}' is not a number of minutes")),
        "pause" => Ok(Command::Pause),
        "resume" => Ok(Command::Resume),
        "abort" => Ok(Command::Abort),
        "status" => Ok(Command::Status),
        "chat" => required("a message").map(Command::Chat),
        "weather" => required("a ZIP code").map(Command::Weather),
        "note" => required("some text").map(Command::Note),
        "quotes" => match rest.to_ascii_lowercase().as_str() {
            "on" => Ok(Command::Quotes(true)),
            "off" => Ok(Command::Quotes(false)),
            _ => Err("quotes takes 'on' or 'off'".to_string()),
        },
        "help" | "?" => Ok(Command::Help),
        "quit" | "exit" => Ok(Command::Quit),
        "" => Err(String::new()),
        other => Err(format!("unknown command '{other}'")),
    }
}

pub fn run(config: &Config) -> CliResult {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    runtime.block_on(drive(config))
}

/// Print status and stage changes as the store reports them.
fn render_changes(store: &Store) {
    let state = store.snapshot();
    let last: Cell<(SessionStatus, TreeStage)> =
        Cell::new((state.session.status, state.session.tree_stage));
    // Stays subscribed for the life of the loop.
    let _ = store.subscribe(move |state| {
        let session = &state.session;
        let (status, stage) = last.replace((session.status, session.tree_stage));
        if status != session.status {
            println!("{}", session_line(session));
            println!("  {}", status_message(session));
        } else if stage != session.tree_stage {
            println!("{}", session_line(session));
        }
        Ok(())
    });
}

/// The current quote, or the paused notice.
fn quote_or_paused(ticker: &QuoteTicker, show_quotes: bool) -> String {
    if show_quotes {
        quote_line(&ticker.current())
    } else {
        PAUSED_MESSAGE.to_string()
    }
}

/// A fresh schedule, or a restart over a live one, starts its first tick one
/// full period out.
fn restarts_interval(restarted: bool, generation_changed: bool) -> bool {
    restarted || generation_changed
}

fn spawn_weather(client: &WeatherClient, zip: String, tx: &mpsc::UnboundedSender<Inbound>) {
    let client = client.clone();
    let tx = tx.clone();
    tokio::spawn(async move {
        let result = client.fetch(&zip).await;
        let _ = tx.send(Inbound::Weather { zip, result });
    });
}

fn spawn_reply(text: &str, delay: Duration, tx: &mpsc::UnboundedSender<Inbound>) {
    let answer = reply(text);
    let tx = tx.clone();
    tokio::spawn(async move {
        tokio::time::sleep(delay).await;
        let _ = tx.send(Inbound::ChatReply(answer));
    });
}

async fn drive(config: &Config) -> CliResult {
    let store = open_store(config)?;
    let period = Duration::from_millis(config.session.tick_interval_ms.max(1));
    let mut engine = SessionEngine::new(store.clone()).with_ticker(Ticker::new(period));
    let client = WeatherClient::new(&config.weather);
    let reply_delay = Duration::from_millis(config.chat.reply_delay_ms);
    let (tx, mut rx) = mpsc::unbounded_channel::<Inbound>();

    render_changes(&store);

    let state = store.snapshot();
    let mood = ambient(Local::now().hour(), state.weather.condition.as_deref());
    println!("blyx  {}  ({} · {})", clock_line(&Local::now()), mood.time, mood.sky);
    if let Some(line) = weather_line(&state.weather) {
        println!("{line}");
    }
    let ttl = config.weather.cache_ttl();
    if !state.weather.zip.is_empty() && state.weather.is_stale(Utc::now(), ttl) {
        tracing::debug!(zip = %state.weather.zip, "weather cache stale; refreshing");
        spawn_weather(&client, state.weather.zip.clone(), &tx);
    }
    let mut quotes = QuoteTicker::default();
    println!("{}", quote_or_paused(&quotes, state.settings.show_quotes));
    drop(state);

    if engine.hydrate() {
        println!("Resuming your session.");
    }
    println!("{}", session_line(&store.snapshot().session));
    println!("{HELP}");

    let mut interval = tokio::time::interval_at(Instant::now() + period, period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut generation = engine.ticker().generation();
    let mut quote_interval = tokio::time::interval_at(Instant::now() + QUOTE_PERIOD, QUOTE_PERIOD);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            _ = interval.tick() => {
                if engine.ticker().is_active() {
                    if let Some(event) = engine.tick() {
                        tracing::debug!(?event, "tick event");
                    }
                }
            }
            _ = quote_interval.tick() => {
                if let Some(quote) = quotes.advance(store.snapshot().settings.show_quotes) {
                    println!("{}", quote_line(&quote));
                }
            }
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                let command = match parse_command(&line) {
                    Ok(command) => command,
                    Err(message) => {
                        if !message.is_empty() {
                            println!("{message}. {HELP}");
                        }
                        continue;
                    }
                };
                let mut restarted = false;
                match command {
                    Command::Quit => break,
                    Command::Help => println!("{HELP}"),
                    Command::Status => {
                        println!("{}", clock_line(&Local::now()));
                        println!("{}", session_line(&store.snapshot().session));
                    }
                    Command::Start(minutes) => {
                        let minutes = minutes.unwrap_or_else(|| i64::from(config.session.default_minutes));
                        restarted = report(engine.start(minutes));
                    }
                    Command::Pause => {
                        report(engine.pause());
                    }
                    Command::Resume => {
                        report(engine.resume());
                    }
                    Command::Abort => {
                        report(engine.abort());
                    }
                    Command::Chat(text) => {
                        let message = ChatMessage::user(text.as_str(), Utc::now());
                        println!("{}", chat_line(&message));
                        store.append_chat_message(message);
                        spawn_reply(&text, reply_delay, &tx);
                    }
                    Command::Weather(zip) => {
                        println!("Fetching weather for {zip}…");
                        spawn_weather(&client, zip, &tx);
                    }
                    Command::Note(text) => {
                        let notes = store.snapshot().notes.clone();
                        let notes = if notes.is_empty() { text } else { format!("{notes}\n{text}") };
                        store.set_notes(notes);
                        println!("Saved");
                    }
                    Command::Quotes(show) => {
                        store.update_settings(|_| SettingsPatch {
                            show_quotes: Some(show),
                            ..Default::default()
                        });
                        println!("{}", quote_or_paused(&quotes, show));
                        if show {
                            quote_interval.reset();
                        }
                    }
                }
                let generation_changed = engine.ticker().generation() != generation;
                if restarts_interval(restarted, generation_changed) {
                    generation = engine.ticker().generation();
                    interval.reset();
                }
            }
            Some(inbound) = rx.recv() => match inbound {
                Inbound::Weather { zip, result: Ok(report) } => {
                    store.set_weather(report.into_patch(&zip, Utc::now()));
                    if let Some(line) = weather_line(&store.snapshot().weather) {
                        println!("{line}");
                    }
                }
                Inbound::Weather { zip, result: Err(e) } => {
                    tracing::warn!(zip = %zip, error = %e, "weather lookup failed");
                    println!("Weather paused: {e}");
                }
                Inbound::ChatReply(answer) => {
                    let message = ChatMessage::assistant(answer, Utc::now());
                    println!("{}", chat_line(&message));
                    store.append_chat_message(message);
                }
            },
            _ = &mut ctrl_c => break,
        }
    }

    store.flush();
    Ok(())
}

/// No-op commands say so; effective ones are rendered by the subscriber.
/// Returns whether the command took effect.
fn report(event: Option<Event>) -> bool {
    match event {
        Some(event) => {
            tracing::debug!(?event, "session command");
            true
        }
        None => {
            println!("Nothing to do right now.");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_commands() {
        assert_eq!(parse_command("start"), Ok(Command::Start(None)));
        assert_eq!(parse_command("  start 50 "), Ok(Command::Start(Some(50))));
        assert_eq!(parse_command("PAUSE"), Ok(Command::Pause));
        assert_eq!(
            parse_command("chat I need a break"),
            Ok(Command::Chat("I need a break".into()))
        );
        assert_eq!(parse_command("weather 10001"), Ok(Command::Weather("10001".into())));
        assert_eq!(parse_command("exit"), Ok(Command::Quit));
        assert_eq!(parse_command("quotes OFF"), Ok(Command::Quotes(false)));
        assert_eq!(parse_command("quotes on"), Ok(Command::Quotes(true)));
    }

    #[test]
    fn rejects_bad_input() {
        assert!(parse_command("start soon").is_err());
        assert!(parse_command("chat").is_err());
        assert!(parse_command("dance").is_err());
        assert!(parse_command("quotes maybe").is_err());
        assert_eq!(parse_command("   "), Err(String::new()));
    }

    #[test]
    fn restart_over_a_live_session_resets_the_interval() {
        assert!(restarts_interval(true, false));
        assert!(restarts_interval(false, true));
        assert!(!restarts_interval(false, false));
    }

    #[test]
    fn hidden_quotes_show_the_paused_notice() {
        let ticker = QuoteTicker::default();
        assert_eq!(quote_or_paused(&ticker, false), PAUSED_MESSAGE);
        assert_eq!(quote_or_paused(&ticker, true), quote_line(&ticker.current()));
    }
}
