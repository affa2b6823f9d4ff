//! Habit domain types.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::HabitError;

/// Color given to habits created without one.
pub const DEFAULT_HABIT_COLOR: &str = "#4F46E5";

/// Reminder time given to habits that never set one.
pub const DEFAULT_REMINDER_TIME: &str = "08:00";

/// Opaque habit identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HabitId(String);

impl HabitId {
    /// Wrap an identifier.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for HabitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for HabitId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for HabitId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// How often a habit is meant to be done.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    /// Every day.
    Daily,
    /// Once a week.
    Weekly,
}

impl Frequency {
    /// Stored / wire name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
        }
    }

    /// Completions that count as 100% over the 30-day rate window.
    #[must_use]
    pub const fn window_target(&self) -> f64 {
        match self {
            Self::Daily => 30.0,
            Self::Weekly => 4.0,
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Frequency {
    type Err = HabitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "daily" => Ok(Self::Daily),
            "weekly" => Ok(Self::Weekly),
            other => Err(HabitError::Parse(format!("Unknown frequency: '{other}'"))),
        }
    }
}

/// A tracked behavior.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Habit {
    /// Unique identifier
    pub id: HabitId,
    /// Owning user
    #[serde(rename = "user_id")]
    pub owner: String,
    /// Display name (1-100 chars)
    pub name: String,
    /// Optional description (up to 500 chars)
    pub description: Option<String>,
    /// Target frequency
    pub target_frequency: Frequency,
    /// Display color (`#RRGGBB`)
    pub color: String,
    /// Whether reminders are wanted
    pub reminder_enabled: bool,
    /// Preferred reminder time (`HH:MM`)
    pub reminder_time: String,
    /// Creation time
    pub created_at: DateTime<Utc>,
    /// Last modification time
    pub updated_at: DateTime<Utc>,
}

/// A record that a habit was done at some instant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Completion {
    /// Unique identifier
    pub id: String,
    /// Habit this completion belongs to
    pub habit_id: HabitId,
    /// When the habit was done
    pub completed_at: DateTime<Utc>,
}

/// Fields for a new habit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateHabitData {
    /// Display name
    pub name: String,
    /// Target frequency
    pub target_frequency: Frequency,
    /// Color, or the default
    pub color: Option<String>,
    /// Optional description
    pub description: Option<String>,
}

impl CreateHabitData {
    /// A daily habit with only a name.
    #[must_use]
    pub fn new(name: impl Into<String>, target_frequency: Frequency) -> Self {
        Self {
            name: name.into(),
            target_frequency,
            color: None,
            description: None,
        }
    }
}

/// A partial update. `None` leaves a field unchanged; an empty
/// description clears it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateHabitData {
    /// New name
    pub name: Option<String>,
    /// New description
    pub description: Option<String>,
    /// New target frequency
    pub target_frequency: Option<Frequency>,
    /// New color
    pub color: Option<String>,
}

impl UpdateHabitData {
    /// Whether the patch changes nothing.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.target_frequency.is_none()
            && self.color.is_none()
    }
}

/// Outcome of toggling a day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Toggle {
    /// A completion was recorded.
    Completed,
    /// Existing completions for the day were removed.
    Uncompleted,
}

impl fmt::Display for Toggle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Completed => write!(f, "completed"),
            Self::Uncompleted => write!(f, "not completed"),
        }
    }
}

/// Statistics derived from a habit's completions.
///
/// Never persisted; recomputed on every read.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct HabitStats {
    /// Consecutive days ending today
    pub current_streak: usize,
    /// Longest run of consecutive days ever
    pub longest_streak: usize,
    /// Percentage of the 30-day target met, 0-100
    pub completion_rate: f64,
    /// Raw number of completion records
    pub total_completions: usize,
    /// Whether there is a completion today
    pub is_completed_today: bool,
}

/// A habit together with its derived statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HabitWithStats {
    /// The habit definition
    #[serde(flatten)]
    pub habit: Habit,
    /// Derived statistics
    #[serde(flatten)]
    pub stats: HabitStats,
}

impl HabitWithStats {
    /// Pair a habit with its statistics.
    #[must_use]
    pub const fn new(habit: Habit, stats: HabitStats) -> Self {
        Self { habit, stats }
    }
}
