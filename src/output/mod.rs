//! Output formatting for habitrack.
//!
//! This module provides formatters for displaying habits in various formats.

mod json;
mod pretty;

use crate::cli::args::OutputFormat;
use crate::error::HabitError;
use crate::habits::{HabitWithStats, Toggle};

pub use json::*;
pub use pretty::*;

/// Format habits based on output format
///
/// # Errors
///
/// Returns `HabitError::Json` if JSON serialization fails.
pub fn format_habits(habits: &[HabitWithStats], format: OutputFormat) -> Result<String, HabitError> {
    match format {
        OutputFormat::Pretty => Ok(format_habits_pretty(habits)),
        OutputFormat::Json => format_habits_json(habits),
    }
}

/// Format a single habit based on output format
///
/// # Errors
///
/// Returns `HabitError::Json` if JSON serialization fails.
pub fn format_habit(habit: &HabitWithStats, format: OutputFormat) -> Result<String, HabitError> {
    match format {
        OutputFormat::Pretty => Ok(format_habit_pretty(habit)),
        OutputFormat::Json => to_json(habit),
    }
}

/// Format a toggle outcome with the refreshed habit
///
/// # Errors
///
/// Returns `HabitError::Json` if JSON serialization fails.
pub fn format_toggle(
    outcome: Toggle,
    habit: &HabitWithStats,
    format: OutputFormat,
) -> Result<String, HabitError> {
    match format {
        OutputFormat::Pretty => Ok(format_toggle_pretty(outcome, habit)),
        OutputFormat::Json => format_toggle_json(outcome, habit),
    }
}
