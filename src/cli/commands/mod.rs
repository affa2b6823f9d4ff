//! Command implementations for habitrack.
//!
//! This module contains the implementation of all CLI commands. Every
//! command runs against a [`Context`] and returns the text to print.

mod habit;
mod shell;
mod stats;

pub use habit::{add, delete, edit, list, reminder, show, toggle};
pub use shell::completions;
pub use stats::stats;

use chrono::{DateTime, Utc};

use crate::cli::args::OutputFormat;
use crate::config::Config;
use crate::core::{DayBoundary, HabitStore};
use crate::error::HabitError;
use crate::features::stats::StatsCollector;
use crate::habits::{Habit, HabitId, HabitWithStats};

/// Everything a command needs: the store, who is asking, and when.
pub struct Context<'a> {
    /// Habit persistence
    pub store: &'a dyn HabitStore,
    /// Owner of the habits, if known
    pub owner: Option<String>,
    /// Instant the command is evaluated at
    pub now: DateTime<Utc>,
    /// Local day rule for streaks and toggles
    pub boundary: DayBoundary,
    /// Output format
    pub format: OutputFormat,
    /// Loaded configuration
    pub config: Config,
}

impl<'a> Context<'a> {
    /// The current owner.
    ///
    /// # Errors
    ///
    /// Returns `HabitError::Unauthorized` if no owner is set.
    pub fn owner(&self) -> Result<&str, HabitError> {
        self.owner
            .as_deref()
            .filter(|owner| !owner.trim().is_empty())
            .ok_or_else(|| {
                HabitError::Unauthorized(
                    "No owner set. Pass --owner, set HABITRACK_OWNER or general.owner in config"
                        .to_string(),
                )
            })
    }

    /// Collector over this context's store.
    #[must_use]
    pub fn collector(&self) -> StatsCollector<'a, dyn HabitStore + 'a> {
        StatsCollector::new(self.store)
    }

    /// Fetch a habit that belongs to the current owner.
    ///
    /// Habits of other owners are reported as missing.
    ///
    /// # Errors
    ///
    /// Returns `Unauthorized` without an owner, or `NotFound`.
    pub fn owned_habit(&self, id: &HabitId) -> Result<Habit, HabitError> {
        let owner = self.owner()?;
        let habit = self.store.get_habit(id)?;
        if habit.owner == owner {
            Ok(habit)
        } else {
            Err(HabitError::NotFound(format!("Habit {id}")))
        }
    }

    /// All of the owner's habits with freshly computed statistics.
    ///
    /// # Errors
    ///
    /// Returns an error if there is no owner or the store fails.
    pub fn habits_with_stats(&self) -> Result<Vec<HabitWithStats>, HabitError> {
        let owner = self.owner()?;
        self.collector()
            .habits_with_stats(owner, self.now, &self.boundary)
    }

    /// Refetch and recompute a single habit after a change.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the habit is no longer in the owner's list.
    pub fn refreshed(&self, id: &HabitId) -> Result<HabitWithStats, HabitError> {
        self.habits_with_stats()?
            .into_iter()
            .find(|h| &h.habit.id == id)
            .ok_or_else(|| HabitError::NotFound(format!("Habit {id}")))
    }
}
