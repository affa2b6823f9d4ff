//! Input validation for habit data.
//!
//! Everything is checked here before a store sees it.

use chrono::NaiveTime;
use once_cell::sync::Lazy;
use regex::Regex;

use super::types::{CreateHabitData, UpdateHabitData};
use crate::error::HabitError;

/// Maximum habit name length, in characters.
pub const MAX_NAME_LEN: usize = 100;

/// Maximum description length, in characters.
pub const MAX_DESCRIPTION_LEN: usize = 500;

static COLOR_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^#[0-9A-Fa-f]{6}$").unwrap_or_else(|e| unreachable!("invalid color regex: {e}"))
});

/// Validate and trim a habit name.
///
/// # Errors
///
/// Returns `HabitError::Validation` if the name is empty or too long.
pub fn validate_name(name: &str) -> Result<String, HabitError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(HabitError::Validation("Habit name is required".to_string()));
    }
    if name.chars().count() > MAX_NAME_LEN {
        return Err(HabitError::Validation(format!(
            "Habit name is too long (max {MAX_NAME_LEN} characters)"
        )));
    }
    Ok(name.to_string())
}

/// Validate a description.
///
/// # Errors
///
/// Returns `HabitError::Validation` if the description is too long.
pub fn validate_description(description: &str) -> Result<(), HabitError> {
    if description.chars().count() > MAX_DESCRIPTION_LEN {
        return Err(HabitError::Validation(format!(
            "Description is too long (max {MAX_DESCRIPTION_LEN} characters)"
        )));
    }
    Ok(())
}

/// Validate a `#RRGGBB` color.
///
/// # Errors
///
/// Returns `HabitError::Validation` for any other format.
pub fn validate_color(color: &str) -> Result<(), HabitError> {
    if COLOR_RE.is_match(color) {
        Ok(())
    } else {
        Err(HabitError::Validation(format!("Invalid color format: '{color}'")))
    }
}

/// Validate an `HH:MM` reminder time.
///
/// # Errors
///
/// Returns `HabitError::Validation` if the time is not a valid 24-hour time.
pub fn validate_reminder_time(time: &str) -> Result<(), HabitError> {
    NaiveTime::parse_from_str(time, "%H:%M")
        .map(|_| ())
        .map_err(|_| HabitError::Validation(format!("Invalid reminder time: '{time}' (use HH:MM)")))
}

impl CreateHabitData {
    /// Check every field, returning a copy with the name trimmed.
    ///
    /// # Errors
    ///
    /// Returns `HabitError::Validation` on the first invalid field.
    pub fn validate(&self) -> Result<Self, HabitError> {
        let name = validate_name(&self.name)?;
        if let Some(description) = &self.description {
            validate_description(description)?;
        }
        if let Some(color) = &self.color {
            validate_color(color)?;
        }
        Ok(Self {
            name,
            ..self.clone()
        })
    }
}

impl UpdateHabitData {
    /// Check every field present in the patch.
    ///
    /// # Errors
    ///
    /// Returns `HabitError::Validation` on the first invalid field.
    pub fn validate(&self) -> Result<Self, HabitError> {
        let name = self.name.as_deref().map(validate_name).transpose()?;
        if let Some(description) = &self.description {
            validate_description(description)?;
        }
        if let Some(color) = &self.color {
            validate_color(color)?;
        }
        Ok(Self {
            name,
            ..self.clone()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::habits::Frequency;

    #[test]
    fn test_name_trimmed() {
        assert_eq!(validate_name("  Drink water ").unwrap(), "Drink water");
    }

    #[test]
    fn test_name_required() {
        assert!(matches!(validate_name("   "), Err(HabitError::Validation(_))));
    }

    #[test]
    fn test_name_length_counts_chars() {
        assert!(validate_name(&"é".repeat(100)).is_ok());
        assert!(validate_name(&"a".repeat(101)).is_err());
    }

    #[test]
    fn test_description_length() {
        assert!(validate_description(&"x".repeat(500)).is_ok());
        assert!(validate_description(&"x".repeat(501)).is_err());
    }

    #[test]
    fn test_color() {
        assert!(validate_color("#4F46E5").is_ok());
        assert!(validate_color("#10b981").is_ok());
        assert!(validate_color("4F46E5").is_err());
        assert!(validate_color("#4F46E").is_err());
        assert!(validate_color("#GGGGGG").is_err());
    }

    #[test]
    fn test_reminder_time() {
        assert!(validate_reminder_time("08:00").is_ok());
        assert!(validate_reminder_time("23:59").is_ok());
        assert!(validate_reminder_time("24:00").is_err());
        assert!(validate_reminder_time("8am").is_err());
    }

    #[test]
    fn test_create_validate() {
        let mut data = CreateHabitData::new(" Stretch ", Frequency::Daily);
        assert_eq!(data.validate().unwrap().name, "Stretch");

        data.color = Some("blue".to_string());
        assert!(data.validate().is_err());
    }

    #[test]
    fn test_update_validate_only_checks_present_fields() {
        assert!(UpdateHabitData::default().validate().is_ok());

        let patch = UpdateHabitData {
            name: Some(String::new()),
            ..Default::default()
        };
        assert!(patch.validate().is_err());
    }
}
