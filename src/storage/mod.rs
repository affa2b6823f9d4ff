//! Storage layer for habitrack.
//!
//! This module provides SQLite-based persistence for:
//! - Habits (name, frequency, color, reminder preference)
//! - Habit completions (one record per check-in)

mod database;
mod habits;
mod migrations;

pub use database::Database;
pub use habits::HabitStorage;
