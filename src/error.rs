//! Error types for habitrack.

use thiserror::Error;

/// Errors that can occur while tracking habits.
#[derive(Debug, Error)]
pub enum HabitError {
    /// Configuration could not be loaded or saved.
    #[error("configuration error: {0}")]
    Config(String),

    /// The local database rejected an operation.
    #[error("database error: {0}")]
    Database(String),

    /// Input could not be parsed (timestamps, days, JSON).
    #[error("parse error: {0}")]
    Parse(String),

    /// Filesystem error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization failed.
    #[error("parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// A habit or completion does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// Input failed validation before reaching the store.
    #[error("invalid input: {0}")]
    Validation(String),

    /// Too many failed attempts for a key.
    #[error("too many failed attempts, retry in {retry_after_secs} seconds")]
    RateLimited {
        /// Seconds until the key is unlocked.
        retry_after_secs: u64,
    },

    /// No owner identity was supplied.
    #[error("unauthorized: {0}")]
    Unauthorized(String),
}

impl HabitError {
    /// Process exit code for this error.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Validation(_) | Self::Parse(_) | Self::Json(_) => 2,
            Self::NotFound(_) => 3,
            Self::Unauthorized(_) | Self::RateLimited { .. } => 4,
            Self::Config(_) | Self::Database(_) | Self::Io(_) => 1,
        }
    }
}
