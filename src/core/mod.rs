//! Core abstractions for habitrack.
//!
//! This module provides the shared day-boundary rule, the injectable clock,
//! and the store contract used across features.

mod datetime;
mod traits;

pub use datetime::{format_timestamp, parse_day, parse_timestamp, DayBoundary};
pub use traits::{Clock, FixedClock, HabitStore, SystemClock};

#[cfg(test)]
pub use traits::MockHabitStore;
