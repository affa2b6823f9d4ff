//! Habit commands: list, show, add, edit, delete, toggle, reminder.
//!
//! Every mutation refetches the owner's habits and prints the refreshed
//! habit so the statistics shown always match the store.

use tracing::debug;

use super::Context;
use crate::cli::args::{AddArgs, EditArgs, OutputFormat, ReminderArgs};
use crate::core::parse_day;
use crate::error::HabitError;
use crate::habits::{CreateHabitData, HabitId, UpdateHabitData};
use crate::output::{format_habit, format_habits, format_toggle, to_json};

/// List the owner's habits with statistics.
///
/// # Errors
///
/// Returns an error if there is no owner or the store fails.
pub fn list(ctx: &Context<'_>) -> Result<String, HabitError> {
    let habits = ctx.habits_with_stats()?;
    format_habits(&habits, ctx.format)
}

/// Show one habit.
///
/// # Errors
///
/// Returns `NotFound` if the habit does not exist or is not the owner's.
pub fn show(ctx: &Context<'_>, id: &str) -> Result<String, HabitError> {
    let habit = ctx.refreshed(&HabitId::new(id))?;
    format_habit(&habit, ctx.format)
}

/// Create a habit.
///
/// # Errors
///
/// Returns `Validation` for bad input, or a store error.
pub fn add(ctx: &Context<'_>, args: AddArgs) -> Result<String, HabitError> {
    let owner = ctx.owner()?;
    let data = CreateHabitData {
        name: args.name,
        target_frequency: args.frequency,
        color: Some(
            args.color
                .unwrap_or_else(|| ctx.config.habits.default_color.clone()),
        ),
        description: args.description,
    };

    let habit = ctx.store.create_habit(owner, &data, ctx.now)?;
    let refreshed = ctx.refreshed(&habit.id)?;
    format_habit(&refreshed, ctx.format)
}

/// Apply a partial update to a habit.
///
/// # Errors
///
/// Returns `Validation` if nothing would change or a field is invalid.
pub fn edit(ctx: &Context<'_>, args: EditArgs) -> Result<String, HabitError> {
    let id = HabitId::new(args.id);
    let patch = UpdateHabitData {
        name: args.name,
        description: args.description,
        target_frequency: args.frequency,
        color: args.color,
    };
    if patch.is_empty() {
        return Err(HabitError::Validation(
            "Nothing to change. Pass --name, --description, --frequency or --color".to_string(),
        ));
    }

    ctx.owned_habit(&id)?;
    ctx.store.update_habit(&id, &patch, ctx.now)?;
    let refreshed = ctx.refreshed(&id)?;
    format_habit(&refreshed, ctx.format)
}

/// Delete a habit and its completions.
///
/// # Errors
///
/// Returns `NotFound` if the habit does not exist or is not the owner's.
pub fn delete(ctx: &Context<'_>, id: &str) -> Result<String, HabitError> {
    let id = HabitId::new(id);
    let habit = ctx.owned_habit(&id)?;
    ctx.store.delete_habit(&id)?;

    match ctx.format {
        OutputFormat::Json => to_json(&serde_json::json!({
            "deleted": habit.id,
            "name": habit.name,
        })),
        OutputFormat::Pretty => Ok(format!("Deleted habit: {}", habit.name)),
    }
}

/// Toggle a day's completion.
///
/// # Errors
///
/// Returns `Parse` for an unreadable day, `Validation` for a future day,
/// or `NotFound` for a habit the owner does not have.
pub fn toggle(ctx: &Context<'_>, id: &str, day: &str) -> Result<String, HabitError> {
    let id = HabitId::new(id);
    let day = parse_day(day, ctx.now, &ctx.boundary)?;

    ctx.owned_habit(&id)?;
    let outcome = ctx
        .store
        .toggle_completion(&id, day, ctx.now, &ctx.boundary)?;
    debug!(%id, %day, %outcome, "toggle applied");

    let refreshed = ctx.refreshed(&id)?;
    format_toggle(outcome, &refreshed, ctx.format)
}

/// Enable or disable a habit's reminder.
///
/// # Errors
///
/// Returns `Validation` for a bad time, or `NotFound`.
pub fn reminder(ctx: &Context<'_>, args: ReminderArgs) -> Result<String, HabitError> {
    let owner = ctx.owner()?;
    let id = HabitId::new(args.id);
    let enabled = args.enable && !args.disable;

    let time = match args.time {
        Some(time) => time,
        None if enabled => ctx.config.habits.default_reminder_time.clone(),
        None => ctx.owned_habit(&id)?.reminder_time,
    };

    ctx.store.set_reminder(owner, &id, enabled, &time, ctx.now)?;
    let refreshed = ctx.refreshed(&id)?;
    format_habit(&refreshed, ctx.format)
}
