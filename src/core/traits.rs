//! Shared traits for habitrack.
//!
//! [`Clock`] keeps "now" injectable so statistics stay deterministic, and
//! [`HabitStore`] is the narrow read/write contract the rest of the crate
//! uses to reach persistence.

use std::cell::Cell;

use chrono::{DateTime, Duration, NaiveDate, Utc};

use super::datetime::DayBoundary;
use crate::error::HabitError;
use crate::habits::{Completion, CreateHabitData, Habit, HabitId, Toggle, UpdateHabitData};

/// Source of the current instant.
pub trait Clock {
    /// The current instant.
    fn now(&self) -> DateTime<Utc>;
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> DateTime<Utc> {
        (**self).now()
    }
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock that only moves when told to.
#[derive(Debug, Clone)]
pub struct FixedClock {
    now: Cell<DateTime<Utc>>,
}

impl FixedClock {
    /// Create a clock frozen at `now`.
    #[must_use]
    pub const fn new(now: DateTime<Utc>) -> Self {
        Self {
            now: Cell::new(now),
        }
    }

    /// Move the clock forward.
    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }

    /// Jump to a specific instant.
    pub fn set(&self, now: DateTime<Utc>) {
        self.now.set(now);
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.now.get()
    }
}

/// Persistence contract for habits and completions.
///
/// Deleting a habit must delete its completions. Toggling removes every
/// completion recorded on that day, or records one if there were none.
#[cfg_attr(test, mockall::automock)]
pub trait HabitStore {
    /// All habits belonging to `owner`, newest first.
    fn list_habits(&self, owner: &str) -> Result<Vec<Habit>, HabitError>;

    /// Completions for the given habits, newest first.
    fn list_completions(&self, habit_ids: &[HabitId]) -> Result<Vec<Completion>, HabitError>;

    /// A single habit.
    fn get_habit(&self, id: &HabitId) -> Result<Habit, HabitError>;

    /// Create a habit for `owner`.
    fn create_habit(
        &self,
        owner: &str,
        data: &CreateHabitData,
        now: DateTime<Utc>,
    ) -> Result<Habit, HabitError>;

    /// Apply a partial update.
    fn update_habit(
        &self,
        id: &HabitId,
        patch: &UpdateHabitData,
        now: DateTime<Utc>,
    ) -> Result<Habit, HabitError>;

    /// Delete a habit and its completions.
    fn delete_habit(&self, id: &HabitId) -> Result<(), HabitError>;

    /// Flip the done state of `habit_id` on `day`.
    fn toggle_completion(
        &self,
        habit_id: &HabitId,
        day: NaiveDate,
        now: DateTime<Utc>,
        boundary: &DayBoundary,
    ) -> Result<Toggle, HabitError>;

    /// Change reminder preferences. Only the owner may do this.
    fn set_reminder(
        &self,
        owner: &str,
        id: &HabitId,
        enabled: bool,
        time: &str,
        now: DateTime<Utc>,
    ) -> Result<Habit, HabitError>;
}
