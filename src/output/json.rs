//! JSON output formatting for habitrack.

use serde::Serialize;
use serde_json::json;

use crate::error::HabitError;
use crate::habits::{HabitWithStats, Toggle};

/// Format habits as JSON
///
/// # Errors
///
/// Returns `HabitError::Json` if JSON serialization fails.
pub fn format_habits_json(habits: &[HabitWithStats]) -> Result<String, HabitError> {
    let output = json!({
        "count": habits.len(),
        "items": habits
    });
    Ok(serde_json::to_string_pretty(&output)?)
}

/// Format a toggle outcome as JSON
///
/// # Errors
///
/// Returns `HabitError::Json` if JSON serialization fails.
pub fn format_toggle_json(outcome: Toggle, habit: &HabitWithStats) -> Result<String, HabitError> {
    let output = json!({
        "result": outcome,
        "habit": habit
    });
    Ok(serde_json::to_string_pretty(&output)?)
}

/// Generic JSON formatter for any serializable type
///
/// # Errors
///
/// Returns `HabitError::Json` if JSON serialization fails.
pub fn to_json<T: Serialize>(value: &T) -> Result<String, HabitError> {
    Ok(serde_json::to_string_pretty(value)?)
}
