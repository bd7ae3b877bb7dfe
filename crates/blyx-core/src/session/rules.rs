//! Pure gamification rules: duration clamping, progress, tree stages,
//! coin rewards and streaks.
//!
//! Rounding is half-up on non-negative values and done in integers.

use chrono::NaiveDate;

use crate::state::{Session, Stats, TreeStage, MAX_SESSION_MINUTES, MIN_SESSION_MINUTES};

/// Progress thresholds, ascending. The stage is the last one reached.
const TREE_STAGES: [(u32, TreeStage); 5] = [
    (0, TreeStage::Seedling),
    (25, TreeStage::Sapling),
    (50, TreeStage::Growing),
    (75, TreeStage::Blooming),
    (95, TreeStage::Flourishing),
];

/// `round(numerator / denominator)` for non-negative integers, halves up.
fn round_div(numerator: u64, denominator: u64) -> u64 {
    (2 * numerator + denominator) / (2 * denominator)
}

pub fn clamp_minutes(minutes: i64) -> u32 {
    minutes.clamp(MIN_SESSION_MINUTES as i64, MAX_SESSION_MINUTES as i64) as u32
}

/// `100 - round(remaining / total * 100)`, where total is the planned length
/// in seconds.
pub fn progress_percent(remaining_seconds: u32, planned_minutes: u32) -> u32 {
    let total = u64::from(planned_minutes) * 60;
    if total == 0 {
        return 100;
    }
    let remaining = u64::from(remaining_seconds).min(total);
    100 - round_div(remaining * 100, total) as u32
}

/// Progress of a session as stored.
pub fn session_progress(session: &Session) -> u32 {
    progress_percent(session.remaining_seconds, session.planned_minutes)
}

pub fn tree_stage_for(progress: u32) -> TreeStage {
    TREE_STAGES
        .iter()
        .rev()
        .find(|(threshold, _)| progress >= *threshold)
        .map(|(_, stage)| *stage)
        .unwrap_or(TreeStage::Seedling)
}

/// `max(5, round(minutes / 5) * 2)`.
pub fn coins_for(planned_minutes: u32) -> u32 {
    let coins = round_div(u64::from(planned_minutes), 5) as u32 * 2;
    coins.max(5)
}

/// Whole minutes focused before an abort, rounded.
pub fn elapsed_minutes(planned_minutes: u32, remaining_seconds: u32) -> u32 {
    let elapsed = (u64::from(planned_minutes) * 60).saturating_sub(u64::from(remaining_seconds));
    round_div(elapsed, 60) as u32
}

/// Streak after a completion on `today`.
///
/// No prior completion starts at 1; the same day holds; the next day
/// extends by one; any other gap resets to 1.
pub fn compute_streak(last_day: Option<NaiveDate>, today: NaiveDate, previous: u32) -> u32 {
    let Some(last_day) = last_day else {
        return 1;
    };
    match (today - last_day).num_days() {
        0 => previous.max(1),
        1 => previous + 1,
        _ => 1,
    }
}

/// Daily counters as they stand on `today`: zeroed when the last completion
/// fell on another calendar day.
pub fn normalize_daily(stats: &Stats, last_day: Option<NaiveDate>, today: NaiveDate) -> (u32, u32) {
    match last_day {
        Some(day) if day != today => (0, 0),
        _ => (stats.daily_focus_minutes, stats.sessions_completed),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 5, d).unwrap()
    }

    #[test]
    fn clamp_bounds() {
        assert_eq!(clamp_minutes(0), 5);
        assert_eq!(clamp_minutes(-30), 5);
        assert_eq!(clamp_minutes(25), 25);
        assert_eq!(clamp_minutes(181), 180);
        assert_eq!(clamp_minutes(i64::MAX), 180);
    }

    #[test]
    fn progress_after_thirty_seconds_of_25_minutes() {
        assert_eq!(progress_percent(1470, 25), 2);
        assert_eq!(tree_stage_for(2), TreeStage::Seedling);
    }

    #[test]
    fn progress_endpoints() {
        assert_eq!(progress_percent(1500, 25), 0);
        assert_eq!(progress_percent(0, 25), 100);
        assert_eq!(progress_percent(10, 0), 100);
    }

    #[test]
    fn stage_thresholds() {
        assert_eq!(tree_stage_for(0), TreeStage::Seedling);
        assert_eq!(tree_stage_for(24), TreeStage::Seedling);
        assert_eq!(tree_stage_for(25), TreeStage::Sapling);
        assert_eq!(tree_stage_for(50), TreeStage::Growing);
        assert_eq!(tree_stage_for(74), TreeStage::Growing);
        assert_eq!(tree_stage_for(75), TreeStage::Blooming);
        assert_eq!(tree_stage_for(95), TreeStage::Flourishing);
        assert_eq!(tree_stage_for(100), TreeStage::Flourishing);
    }

    #[test]
    fn coin_rewards() {
        assert_eq!(coins_for(25), 10);
        assert_eq!(coins_for(5), 5);
        assert_eq!(coins_for(12), 5);
        assert_eq!(coins_for(13), 6);
        assert_eq!(coins_for(180), 72);
    }

    #[test]
    fn elapsed_rounds_half_up() {
        assert_eq!(elapsed_minutes(25, 1500), 0);
        assert_eq!(elapsed_minutes(25, 1470), 1);
        assert_eq!(elapsed_minutes(25, 1471), 0);
        assert_eq!(elapsed_minutes(25, 0), 25);
        assert_eq!(elapsed_minutes(25, 9999), 0);
    }

    #[test]
    fn streak_rules() {
        assert_eq!(compute_streak(None, day(10), 0), 1);
        assert_eq!(compute_streak(Some(day(10)), day(10), 4), 4);
        assert_eq!(compute_streak(Some(day(9)), day(10), 4), 5);
        assert_eq!(compute_streak(Some(day(8)), day(10), 4), 1);
        assert_eq!(compute_streak(Some(day(11)), day(10), 4), 1);
    }

    #[test]
    fn daily_counters_reset_on_new_day() {
        let stats = Stats {
            daily_focus_minutes: 50,
            sessions_completed: 2,
            ..Default::default()
        };
        assert_eq!(normalize_daily(&stats, Some(day(10)), day(10)), (50, 2));
        assert_eq!(normalize_daily(&stats, Some(day(9)), day(10)), (0, 0));
        assert_eq!(normalize_daily(&stats, None, day(10)), (50, 2));
    }

    proptest! {
        #[test]
        fn clamp_always_in_range(minutes in any::<i64>()) {
            let clamped = clamp_minutes(minutes);
            prop_assert!((MIN_SESSION_MINUTES..=MAX_SESSION_MINUTES).contains(&clamped));
        }

        #[test]
        fn stage_is_monotonic_in_progress(a in 0u32..=100, b in 0u32..=100) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(tree_stage_for(lo) as u8 <= tree_stage_for(hi) as u8);
        }

        #[test]
        fn progress_never_exceeds_100(remaining in 0u32..20_000, planned in 5u32..=180) {
            prop_assert!(progress_percent(remaining, planned) <= 100);
        }
    }
}
