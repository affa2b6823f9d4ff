//! Feature implementations for habitrack.
//!
//! - Statistics (streaks, completion rate, dashboards)
//! - Failed-attempt rate limiting
//! - Shell integration

pub mod auth;
pub mod shell;
pub mod stats;
