//! Habit domain model.
//!
//! Habits, their completions, update payloads, and the derived statistics
//! projection shown to users.

mod types;
pub mod validation;

pub use types::{
    Completion, CreateHabitData, Frequency, Habit, HabitId, HabitStats, HabitWithStats, Toggle,
    UpdateHabitData, DEFAULT_HABIT_COLOR, DEFAULT_REMINDER_TIME,
};
