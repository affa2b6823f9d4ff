//! Habit statistics engine.
//!
//! Derives streaks, completion rate and "done today" from a habit's raw
//! completion timestamps. Pure: the same habit, completions and `now`
//! always give the same answer.

use chrono::{DateTime, Duration, NaiveDate, Utc};

use crate::core::DayBoundary;
use crate::habits::{Frequency, Habit, HabitStats};

/// Length of the rolling completion-rate window.
pub const RATE_WINDOW_DAYS: i64 = 30;

/// Compute statistics for one habit.
///
/// `completions` may be in any order and may hold several entries for the
/// same day.
#[must_use]
pub fn compute_stats(
    habit: &Habit,
    completions: &[DateTime<Utc>],
    now: DateTime<Utc>,
    boundary: &DayBoundary,
) -> HabitStats {
    let days = distinct_days(completions, boundary);
    let today = boundary.today(now);

    HabitStats {
        current_streak: current_streak(&days, today),
        longest_streak: longest_streak(&days),
        completion_rate: completion_rate(habit.target_frequency, completions, now),
        total_completions: completions.len(),
        is_completed_today: completions.iter().any(|ts| boundary.contains(today, *ts)),
    }
}

/// Distinct calendar days, ascending.
fn distinct_days(completions: &[DateTime<Utc>], boundary: &DayBoundary) -> Vec<NaiveDate> {
    let mut days: Vec<NaiveDate> = completions.iter().map(|ts| boundary.day_of(*ts)).collect();
    days.sort_unstable();
    days.dedup();
    days
}

/// Consecutive days ending today. Zero unless today itself is done.
///
/// Days after `today` are skipped rather than treated as a break.
fn current_streak(days: &[NaiveDate], today: NaiveDate) -> usize {
    let mut streak = 0;
    let mut cursor = today;

    for &day in days.iter().rev().skip_while(|d| **d > today) {
        if day != cursor {
            break;
        }
        streak += 1;
        cursor -= Duration::days(1);
    }

    streak
}

/// Longest run of consecutive days.
fn longest_streak(days: &[NaiveDate]) -> usize {
    let mut longest = 0;
    let mut run = 0;
    let mut prev: Option<NaiveDate> = None;

    for &day in days {
        run = match prev {
            Some(p) if day - p == Duration::days(1) => run + 1,
            _ => 1,
        };
        longest = longest.max(run);
        prev = Some(day);
    }

    longest
}

/// Percentage of the window target met, capped at 100.
///
/// Counts raw records whose instant lies in `[now - 30 days, now]`.
fn completion_rate(frequency: Frequency, completions: &[DateTime<Utc>], now: DateTime<Utc>) -> f64 {
    let window_start = now - Duration::days(RATE_WINDOW_DAYS);
    let recent = completions
        .iter()
        .filter(|ts| **ts >= window_start && **ts <= now)
        .count();

    (recent as f64 / frequency.window_target() * 100.0).min(100.0)
}
