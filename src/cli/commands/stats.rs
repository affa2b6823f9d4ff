//! Statistics command implementation.
//!
//! Handles the stats subcommands: overview dashboard, XP, achievements
//! and the completion heatmap.

use colored::Colorize;
use serde_json::json;

use super::Context;
use crate::cli::args::{OutputFormat, StatsCommands};
use crate::error::HabitError;
use crate::features::stats::{
    achievements, daily_counts, intensity, render_heatmap, render_progress_bar, render_sparkline,
    render_summary_box, Achievement, Overview, XpSummary, MAX_HEATMAP_WEEKS,
};
use crate::habits::HabitWithStats;
use crate::output::to_json;

/// Days shown in the dashboard's activity sparkline.
const SPARKLINE_DAYS: usize = 7;

/// Execute stats subcommands.
///
/// # Errors
///
/// Returns an error if there is no owner or the store fails.
pub fn stats(ctx: &Context<'_>, cmd: Option<StatsCommands>) -> Result<String, HabitError> {
    let owner = ctx.owner()?;
    let data = ctx.collector().collect(owner)?;
    let habits = data.habits_with_stats(ctx.now, &ctx.boundary);
    let today = ctx.boundary.today(ctx.now);

    match cmd {
        None => {
            let activity: Vec<usize> =
                daily_counts(data.all_completions(), &ctx.boundary, today, SPARKLINE_DAYS)
                    .into_iter()
                    .map(|(_, count)| count)
                    .collect();
            render_dashboard(&habits, &activity, ctx.format)
        }
        Some(StatsCommands::Overview) => render_overview(&Overview::calculate(&habits), ctx.format),
        Some(StatsCommands::Xp) => render_xp(&XpSummary::calculate(&habits), ctx.format),
        Some(StatsCommands::Achievements) => render_achievements(&achievements(&habits), ctx.format),
        Some(StatsCommands::Heatmap { weeks }) => {
            let weeks = weeks
                .unwrap_or(ctx.config.stats.heatmap_weeks)
                .clamp(1, MAX_HEATMAP_WEEKS);
            let counts = daily_counts(
                data.all_completions(),
                &ctx.boundary,
                today,
                weeks as usize * 7,
            );
            render_heatmap_cmd(&counts, weeks, ctx.format)
        }
    }
}

/// Render the full dashboard.
fn render_dashboard(
    habits: &[HabitWithStats],
    activity: &[usize],
    format: OutputFormat,
) -> Result<String, HabitError> {
    let overview = Overview::calculate(habits);
    let xp = XpSummary::calculate(habits);
    let badges = achievements(habits);

    match format {
        OutputFormat::Json => to_json(&json!({
            "overview": overview,
            "xp": xp,
            "achievements": badges,
        })),
        OutputFormat::Pretty => {
            let mut output = Vec::new();

            output.push("HABIT DASHBOARD".bold().to_string());
            output.push("─".repeat(50));
            output.push(format!(
                "  Habits: {}  Done today: {}  Best streak: {}",
                overview.total_habits.to_string().cyan(),
                if overview.completed_today == overview.total_habits && overview.total_habits > 0 {
                    overview.completed_today.to_string().green().to_string()
                } else {
                    overview.completed_today.to_string().yellow().to_string()
                },
                format!("{} days", overview.longest_streak).yellow()
            ));
            output.push(format!(
                "  Today:      {}",
                render_progress_bar(overview.today_progress() * 100.0, 20)
            ));
            output.push(format!(
                "  30 days:    {}",
                render_progress_bar(f64::from(overview.average_completion), 20)
            ));
            output.push(format!(
                "  Last week:  {}",
                render_sparkline(activity).cyan()
            ));
            output.push(String::new());

            output.push("LEVEL".bold().to_string());
            output.push("─".repeat(50));
            output.push(xp_line(&xp));
            output.push(String::new());

            let unlocked: Vec<&Achievement> = badges.iter().filter(|a| a.unlocked).collect();
            output.push(format!(
                "{} ({}/{})",
                "ACHIEVEMENTS".bold(),
                unlocked.len(),
                badges.len()
            ));
            output.push("─".repeat(50));
            if unlocked.is_empty() {
                output.push("  None yet. Add a habit to get started.".dimmed().to_string());
            }
            for badge in unlocked {
                output.push(format!("  {} {}", "★".yellow(), badge.name));
            }

            Ok(output.join("\n"))
        }
    }
}

fn render_overview(overview: &Overview, format: OutputFormat) -> Result<String, HabitError> {
    match format {
        OutputFormat::Json => to_json(overview),
        OutputFormat::Pretty => Ok(render_summary_box(
            "Overview",
            &[
                ("Habits", overview.total_habits.to_string()),
                (
                    "Done today",
                    format!("{}/{}", overview.completed_today, overview.total_habits),
                ),
                ("Best streak", format!("{} days", overview.longest_streak)),
                ("Avg completion", format!("{}%", overview.average_completion)),
            ],
        )),
    }
}

fn xp_line(xp: &XpSummary) -> String {
    format!(
        "  Level {}  {} XP  {}  {} XP to next level",
        xp.level.to_string().green().bold(),
        xp.total_xp,
        render_progress_bar(xp.level_progress() as f64, 20),
        xp.xp_to_next_level
    )
}

fn render_xp(xp: &XpSummary, format: OutputFormat) -> Result<String, HabitError> {
    match format {
        OutputFormat::Json => to_json(xp),
        OutputFormat::Pretty => Ok(xp_line(xp)),
    }
}

fn render_achievements(list: &[Achievement], format: OutputFormat) -> Result<String, HabitError> {
    match format {
        OutputFormat::Json => to_json(&json!({
            "count": list.len(),
            "unlocked": list.iter().filter(|a| a.unlocked).count(),
            "items": list,
        })),
        OutputFormat::Pretty => {
            let lines: Vec<String> = list
                .iter()
                .map(|a| {
                    if a.unlocked {
                        format!("{} {}  {}", "★".yellow(), a.name.bold(), a.description.dimmed())
                    } else {
                        format!("{} {}  {}", "☆".dimmed(), a.name.dimmed(), a.description.dimmed())
                    }
                })
                .collect();
            Ok(lines.join("\n"))
        }
    }
}

fn render_heatmap_cmd(
    counts: &[(chrono::NaiveDate, usize)],
    weeks: u32,
    format: OutputFormat,
) -> Result<String, HabitError> {
    match format {
        OutputFormat::Json => {
            let days: Vec<_> = counts
                .iter()
                .map(|(date, count)| {
                    json!({
                        "date": date,
                        "count": count,
                        "level": intensity(*count),
                    })
                })
                .collect();
            to_json(&json!({ "weeks": weeks, "days": days }))
        }
        OutputFormat::Pretty => {
            let total: usize = counts.iter().map(|(_, c)| c).sum();
            Ok(format!(
                "{} (last {weeks} weeks, {total} completions)\n\n{}",
                "Completion heatmap".bold(),
                render_heatmap(counts)
            ))
        }
    }
}
