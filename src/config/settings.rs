//! Configuration settings for habitrack.
//!
//! Settings are loaded from `~/.habitrack/config.yaml`.

use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::cli::args::OutputFormat;
use crate::core::DayBoundary;
use crate::error::HabitError;
use crate::features::auth::RateLimitPolicy;
use crate::features::stats::MAX_HEATMAP_WEEKS;
use crate::habits::{DEFAULT_HABIT_COLOR, DEFAULT_REMINDER_TIME};

/// Main configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// General settings.
    pub general: GeneralConfig,
    /// Defaults for new habits.
    pub habits: HabitsConfig,
    /// Failed-attempt limits.
    pub auth: AuthConfig,
    /// Statistics settings.
    pub stats: StatsConfig,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Default output format.
    #[serde(default = "default_output_format")]
    pub default_output: OutputFormat,
    /// Color output setting.
    #[serde(default = "default_color")]
    pub color: ColorSetting,
    /// Owner used when `--owner` is not given.
    #[serde(default)]
    pub owner: Option<String>,
    /// Fixed UTC offset, in minutes, that defines the owner's day.
    /// The system's local offset is used when absent.
    #[serde(default)]
    pub utc_offset_minutes: Option<i32>,
}

/// Color output setting.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ColorSetting {
    /// Auto-detect based on terminal.
    #[default]
    Auto,
    /// Always use colors.
    Always,
    /// Never use colors.
    Never,
}

/// Defaults applied to new habits and reminders.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HabitsConfig {
    /// Color for habits created without one.
    #[serde(default = "default_habit_color")]
    pub default_color: String,
    /// Reminder time used when enabling a reminder without `--time`.
    #[serde(default = "default_reminder_time")]
    pub default_reminder_time: String,
}

/// Failed-attempt rate limiting.
///
/// Read by library callers that guard a sign-in flow through
/// [`AuthConfig::policy`]. The CLI itself has no sign-in and never consults it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Failures allowed before a lockout.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    /// Lockout duration in minutes.
    #[serde(default = "default_lockout_minutes")]
    pub lockout_minutes: u32,
    /// Maximum number of tracked keys. Zero disables tracking.
    #[serde(default = "default_capacity")]
    pub capacity: usize,
}

/// Statistics settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StatsConfig {
    /// Number of weeks shown by the heatmap, clamped to 1-520 on load.
    #[serde(default = "default_heatmap_weeks")]
    pub heatmap_weeks: u32,
}

// Default value functions for serde
const fn default_output_format() -> OutputFormat {
    OutputFormat::Pretty
}

const fn default_color() -> ColorSetting {
    ColorSetting::Auto
}

fn default_habit_color() -> String {
    DEFAULT_HABIT_COLOR.to_string()
}

fn default_reminder_time() -> String {
    DEFAULT_REMINDER_TIME.to_string()
}

const fn default_max_attempts() -> u32 {
    5
}

const fn default_lockout_minutes() -> u32 {
    15
}

const fn default_capacity() -> usize {
    1024
}

const fn default_heatmap_weeks() -> u32 {
    12
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            default_output: default_output_format(),
            color: default_color(),
            owner: None,
            utc_offset_minutes: None,
        }
    }
}

impl Default for HabitsConfig {
    fn default() -> Self {
        Self {
            default_color: default_habit_color(),
            default_reminder_time: default_reminder_time(),
        }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            lockout_minutes: default_lockout_minutes(),
            capacity: default_capacity(),
        }
    }
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self {
            heatmap_weeks: default_heatmap_weeks(),
        }
    }
}

impl GeneralConfig {
    /// Day boundary for the configured offset.
    ///
    /// # Errors
    ///
    /// Returns an error if the offset is out of range.
    pub fn day_boundary(&self) -> Result<DayBoundary, HabitError> {
        self.utc_offset_minutes
            .map_or_else(|| Ok(DayBoundary::local()), DayBoundary::from_offset_minutes)
    }
}

impl AuthConfig {
    /// Rate limiter policy for these settings.
    #[must_use]
    pub fn policy(&self) -> RateLimitPolicy {
        RateLimitPolicy {
            max_attempts: self.max_attempts,
            lockout: Duration::minutes(i64::from(self.lockout_minutes)),
            capacity: self.capacity,
        }
    }
}

impl Config {
    /// Load configuration from a specific path.
    ///
    /// If the config file doesn't exist, returns default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed.
    pub fn load_from_path(path: &std::path::Path) -> Result<Self, HabitError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path).map_err(|e| {
            HabitError::Config(format!(
                "Failed to read config file {}: {e}",
                path.display()
            ))
        })?;

        let mut config: Self = serde_yaml::from_str(&contents).map_err(|e| {
            HabitError::Config(format!(
                "Failed to parse config file {}: {e}",
                path.display()
            ))
        })?;
        config.stats.heatmap_weeks = config.stats.heatmap_weeks.clamp(1, MAX_HEATMAP_WEEKS);

        Ok(config)
    }

    /// Save configuration to a specific path.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file cannot be written.
    pub fn save_to_path(&self, path: &std::path::Path) -> Result<(), HabitError> {
        let contents = serde_yaml::to_string(self)
            .map_err(|e| HabitError::Config(format!("Failed to serialize config: {e}")))?;

        std::fs::write(path, contents).map_err(|e| {
            HabitError::Config(format!(
                "Failed to write config file {}: {e}",
                path.display()
            ))
        })
    }
}
