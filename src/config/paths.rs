//! Path resolution for habitrack configuration and data files.
//!
//! All habitrack data is stored in `~/.habitrack/` unless `HABITRACK_HOME`
//! points elsewhere:
//! - `config.yaml` - Main configuration file
//! - `habitrack.db` - SQLite database for habits and completions

use std::path::PathBuf;

use crate::error::HabitError;

/// Environment variable overriding the data root.
pub const HOME_ENV: &str = "HABITRACK_HOME";

/// Paths to habitrack configuration and data files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paths {
    /// Root directory: `~/.habitrack/`
    pub root: PathBuf,
    /// Config file: `~/.habitrack/config.yaml`
    pub config_file: PathBuf,
    /// Database file: `~/.habitrack/habitrack.db`
    pub database: PathBuf,
}

impl Paths {
    /// Resolve paths from `HABITRACK_HOME`, or the user's home directory.
    ///
    /// # Errors
    ///
    /// Returns an error if neither variable is set.
    pub fn new() -> Result<Self, HabitError> {
        if let Some(root) = std::env::var_os(HOME_ENV).filter(|v| !v.is_empty()) {
            return Ok(Self::with_root(PathBuf::from(root)));
        }

        let home = std::env::var("HOME")
            .map_err(|_| HabitError::Config("Could not determine home directory".to_string()))?;

        Ok(Self::with_root(PathBuf::from(home).join(".habitrack")))
    }

    /// Create paths with a custom root directory (useful for testing).
    #[must_use]
    pub fn with_root(root: PathBuf) -> Self {
        Self {
            config_file: root.join("config.yaml"),
            database: root.join("habitrack.db"),
            root,
        }
    }

    /// Ensure the root directory exists, creating it if necessary.
    ///
    /// # Errors
    ///
    /// Returns an error if directory creation fails.
    pub fn ensure_dirs(&self) -> Result<(), HabitError> {
        if !self.root.exists() {
            std::fs::create_dir_all(&self.root).map_err(|e| {
                HabitError::Config(format!(
                    "Failed to create directory {}: {e}",
                    self.root.display()
                ))
            })?;
        }

        Ok(())
    }
}
