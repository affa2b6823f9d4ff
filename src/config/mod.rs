//! Configuration management for habitrack.
//!
//! This module handles loading and saving configuration from `~/.habitrack/`.

mod paths;
mod settings;

pub use paths::Paths;
pub use settings::{AuthConfig, ColorSetting, Config, GeneralConfig, HabitsConfig, StatsConfig};
