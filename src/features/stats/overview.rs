//! Dashboard overview across all of an owner's habits.

use serde::{Deserialize, Serialize};

use crate::habits::HabitWithStats;

/// Headline numbers for the dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Overview {
    /// Habits being tracked
    pub total_habits: usize,
    /// Habits done today
    pub completed_today: usize,
    /// Longest streak of any habit
    pub longest_streak: usize,
    /// Mean completion rate, rounded to a whole percent
    pub average_completion: u32,
}

impl Overview {
    /// Summarise a set of habits.
    #[must_use]
    pub fn calculate(habits: &[HabitWithStats]) -> Self {
        let total_habits = habits.len();
        let completed_today = habits.iter().filter(|h| h.stats.is_completed_today).count();
        let longest_streak = habits
            .iter()
            .map(|h| h.stats.longest_streak)
            .max()
            .unwrap_or(0);

        let average_completion = if total_habits > 0 {
            let sum: f64 = habits.iter().map(|h| h.stats.completion_rate).sum();
            (sum / total_habits as f64).round() as u32
        } else {
            0
        };

        Self {
            total_habits,
            completed_today,
            longest_streak,
            average_completion,
        }
    }

    /// Fraction of habits done today, 0.0-1.0.
    #[must_use]
    pub fn today_progress(&self) -> f64 {
        if self.total_habits == 0 {
            0.0
        } else {
            self.completed_today as f64 / self.total_habits as f64
        }
    }
}
