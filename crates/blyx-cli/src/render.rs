//! Text rendering for snapshots and events.

use std::fmt::Display;

use blyx_core::quotes::Quote;
use blyx_core::session::rules::session_progress;
use blyx_core::state::{ChatMessage, ChatRole, ForestEntry, Session, SessionStatus, Weather};
use chrono::{DateTime, Local, TimeZone};

/// `mm:ss`, minutes unbounded.
pub fn format_time(seconds: u32) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

pub fn status_label(status: SessionStatus) -> &'static str {
    match status {
        SessionStatus::Idle => "Idle",
        SessionStatus::Running => "Running",
        SessionStatus::Paused => "Paused",
        SessionStatus::Completed => "Completed",
        SessionStatus::Failed => "Failed",
    }
}

pub fn status_message(session: &Session) -> String {
    match session.status {
        SessionStatus::Idle => "Select a duration and plant your focus tree.".to_string(),
        SessionStatus::Running => "Your tree is growing. Stay in the zone!".to_string(),
        SessionStatus::Paused => {
            "Session paused. Resume soon to keep the streak alive.".to_string()
        }
        SessionStatus::Completed => {
            format!("You grew a tree! +{} coins", session.coins_earned)
        }
        SessionStatus::Failed => "The tree withered. Try again when you are ready.".to_string(),
    }
}

/// One-line view of the session: status, clock, progress and stage.
pub fn session_line(session: &Session) -> String {
    format!(
        "{:<9} {}  {:>3}%  {}",
        status_label(session.status),
        format_time(session.remaining_seconds),
        session_progress(session),
        session.tree_stage.label(),
    )
}

pub fn forest_line(entry: &ForestEntry) -> String {
    format!(
        "{:<11} {:>3} min  {}",
        entry.stage.label(),
        entry.duration,
        entry.completed_at.with_timezone(&Local).format("%Y-%m-%d %H:%M"),
    )
}

pub fn weather_line(weather: &Weather) -> Option<String> {
    match (weather.temperature, weather.condition.as_deref()) {
        (Some(temperature), Some(condition)) => Some(format!("{temperature}°F  {condition}")),
        _ => None,
    }
}

pub fn chat_line(message: &ChatMessage) -> String {
    let speaker = match message.role {
        ChatRole::User => "you",
        ChatRole::Assistant => "blyx",
    };
    format!("{speaker}: {}", message.content)
}

pub fn quote_line(quote: &Quote) -> String {
    format!("\u{201c}{}\u{201d}  ({})", quote.text, quote.author)
}

/// Clock and date header, e.g. `09:05  Friday, October 16`.
pub fn clock_line<Tz>(now: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    now.format("%H:%M  %A, %B %-d").to_string()
}

/// Ambient backdrop derived from the local hour and the weather condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ambient {
    pub time: &'static str,
    pub sky: &'static str,
}

pub fn ambient(hour: u32, condition: Option<&str>) -> Ambient {
    let time = if (6..18).contains(&hour) { "day" } else { "night" };
    let rainy = condition.is_some_and(|c| c.to_lowercase().contains("rain"));
    Ambient {
        time,
        sky: if rainy { "rainy" } else { "clear" },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blyx_core::state::TreeStage;

    #[test]
    fn time_format() {
        assert_eq!(format_time(1500), "25:00");
        assert_eq!(format_time(1470), "24:30");
        assert_eq!(format_time(5), "00:05");
        assert_eq!(format_time(180 * 60), "180:00");
    }

    #[test]
    fn session_line_shows_progress_and_stage() {
        let session = Session {
            status: SessionStatus::Running,
            remaining_seconds: 1470,
            ..Default::default()
        };
        assert_eq!(session_line(&session), "Running   24:30    2%  Seedling");
    }

    #[test]
    fn completed_message_includes_coins() {
        let session = Session {
            status: SessionStatus::Completed,
            coins_earned: 10,
            tree_stage: TreeStage::Flourishing,
            ..Default::default()
        };
        assert_eq!(status_message(&session), "You grew a tree! +10 coins");
    }

    #[test]
    fn ambient_boundaries() {
        assert_eq!(ambient(6, None).time, "day");
        assert_eq!(ambient(17, None).time, "day");
        assert_eq!(ambient(18, None).time, "night");
        assert_eq!(ambient(5, None).time, "night");
        assert_eq!(ambient(12, Some("Rainy · Portland")).sky, "rainy");
        assert_eq!(ambient(12, Some("Foggy · Portland")).sky, "clear");
    }

    #[test]
    fn clock_shows_time_and_long_date() {
        let now = chrono::Utc.with_ymd_and_hms(2026, 10, 16, 9, 5, 0).unwrap();
        assert_eq!(clock_line(&now), "09:05  Friday, October 16");
    }

    #[test]
    fn quote_is_attributed() {
        let quote = Quote {
            text: "Well done is better than well said.",
            author: "Benjamin Franklin",
        };
        assert_eq!(
            quote_line(&quote),
            "\u{201c}Well done is better than well said.\u{201d}  (Benjamin Franklin)"
        );
    }

    #[test]
    fn weather_needs_both_fields() {
        let mut weather = Weather::default();
        assert_eq!(weather_line(&weather), None);
        weather.temperature = Some(61);
        weather.condition = Some("Foggy · San Francisco".into());
        assert_eq!(weather_line(&weather).as_deref(), Some("61°F  Foggy · San Francisco"));
    }
}
