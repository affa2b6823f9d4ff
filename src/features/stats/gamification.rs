//! Experience points, levels and achievements.

use serde::{Deserialize, Serialize};

use crate::habits::HabitWithStats;

/// XP earned per completion record.
pub const XP_PER_COMPLETION: usize = 10;
/// XP earned per day of current streak.
pub const XP_PER_STREAK_DAY: usize = 5;
/// Bonus XP for a habit done today.
pub const XP_TODAY_BONUS: usize = 15;
/// XP needed per level.
pub const XP_PER_LEVEL: usize = 100;

/// Total XP and the level it reaches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct XpSummary {
    /// Total XP across all habits
    pub total_xp: usize,
    /// Current level, starting at 1
    pub level: usize,
    /// XP still needed for the next level
    pub xp_to_next_level: usize,
}

impl XpSummary {
    /// Compute XP for a set of habits.
    #[must_use]
    pub fn calculate(habits: &[HabitWithStats]) -> Self {
        let total_xp = habits.iter().map(habit_xp).sum();
        Self::from_total(total_xp)
    }

    /// Level information for a raw XP total.
    #[must_use]
    pub const fn from_total(total_xp: usize) -> Self {
        Self {
            total_xp,
            level: total_xp / XP_PER_LEVEL + 1,
            xp_to_next_level: XP_PER_LEVEL - total_xp % XP_PER_LEVEL,
        }
    }

    /// XP earned inside the current level.
    #[must_use]
    pub const fn level_progress(&self) -> usize {
        self.total_xp % XP_PER_LEVEL
    }
}

/// XP contributed by a single habit.
#[must_use]
pub fn habit_xp(habit: &HabitWithStats) -> usize {
    let stats = &habit.stats;
    let today_bonus = if stats.is_completed_today {
        XP_TODAY_BONUS
    } else {
        0
    };
    stats.total_completions * XP_PER_COMPLETION + stats.current_streak * XP_PER_STREAK_DAY + today_bonus
}

/// An unlockable badge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Achievement {
    /// Stable identifier
    pub id: &'static str,
    /// Display name
    pub name: &'static str,
    /// What it takes to unlock
    pub description: &'static str,
    /// Whether it has been earned
    pub unlocked: bool,
}

/// Longest-streak thresholds for the streak badges.
const STREAK_BADGES: [(&str, &str, &str, usize); 3] = [
    ("week-streak", "Week Warrior", "7-day streak on any habit", 7),
    ("month-streak", "Month Master", "30-day streak on any habit", 30),
    ("legend", "Legend", "100-day streak on any habit", 100),
];

/// Evaluate every achievement against a set of habits.
#[must_use]
pub fn achievements(habits: &[HabitWithStats]) -> Vec<Achievement> {
    let best = habits
        .iter()
        .map(|h| h.stats.longest_streak)
        .max()
        .unwrap_or(0);

    let mut list = vec![Achievement {
        id: "first-habit",
        name: "First Steps",
        description: "Create your first habit",
        unlocked: !habits.is_empty(),
    }];

    list.extend(
        STREAK_BADGES
            .iter()
            .map(|&(id, name, description, threshold)| Achievement {
                id,
                name,
                description,
                unlocked: best >= threshold,
            }),
    );

    list
}
