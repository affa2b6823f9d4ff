use colored::{ColoredString, Colorize};

use crate::features::stats::render_progress_bar;
use crate::habits::{HabitWithStats, Toggle};

/// Format a list of habits as a pretty table
pub fn format_habits_pretty(habits: &[HabitWithStats]) -> String {
    if habits.is_empty() {
        return "Habits (0)\n  No habits yet. Add one with `habitrack add <name>`".to_string();
    }

    let mut output = format!("Habits ({})\n", habits.len());
    output.push_str(&"─".repeat(60));
    output.push('\n');

    for item in habits {
        let stats = &item.stats;
        let mut line = format!(
            "{} {} {}",
            status_icon(stats.is_completed_today),
            swatch(&item.habit.color),
            item.habit.name.bold()
        );

        line.push_str(&format!("  {}", format!("#{}", item.habit.id).dimmed()));
        line.push_str(&format!("  {}", item.habit.target_frequency.as_str().cyan()));

        if stats.current_streak > 0 {
            line.push_str(&format!(
                "  {}",
                format!("🔥 {}", stats.current_streak).yellow()
            ));
        }

        line.push_str(&format!("  {:.0}%", stats.completion_rate));

        output.push_str(&line);
        output.push('\n');
    }

    output
}

/// Format a single habit as pretty output
pub fn format_habit_pretty(item: &HabitWithStats) -> String {
    let habit = &item.habit;
    let stats = &item.stats;

    let mut output = format!(
        "{} {} {}\n",
        status_icon(stats.is_completed_today),
        swatch(&habit.color),
        habit.name.bold()
    );
    output.push_str(&format!("  {}: {}\n", "ID".dimmed(), habit.id));
    output.push_str(&format!(
        "  {}: {}\n",
        "Frequency".dimmed(),
        habit.target_frequency
    ));

    if let Some(description) = &habit.description {
        output.push_str(&format!("  {}: {}\n", "Description".dimmed(), description));
    }

    output.push_str(&format!("  {}: {}\n", "Color".dimmed(), habit.color));
    output.push_str(&format!(
        "  {}: {}\n",
        "Reminder".dimmed(),
        if habit.reminder_enabled {
            format!("on at {}", habit.reminder_time)
        } else {
            "off".to_string()
        }
    ));
    output.push_str(&format!(
        "  {}: {} days (best {})\n",
        "Streak".dimmed(),
        stats.current_streak,
        stats.longest_streak
    ));
    output.push_str(&format!(
        "  {}: {}\n",
        "Last 30 days".dimmed(),
        render_progress_bar(stats.completion_rate, 20)
    ));
    output.push_str(&format!(
        "  {}: {}\n",
        "Completions".dimmed(),
        stats.total_completions
    ));
    output.push_str(&format!(
        "  {}: {}\n",
        "Created".dimmed(),
        habit.created_at.format("%Y-%m-%d %H:%M")
    ));

    output
}

/// Format a toggle outcome followed by the refreshed habit
pub fn format_toggle_pretty(outcome: Toggle, item: &HabitWithStats) -> String {
    let headline = match outcome {
        Toggle::Completed => format!("✓ Marked {} as completed", item.habit.name).green(),
        Toggle::Uncompleted => format!("○ Marked {} as not completed", item.habit.name).yellow(),
    };

    format!("{headline}\n\n{}", format_habit_pretty(item))
}

fn status_icon(done_today: bool) -> ColoredString {
    if done_today {
        "[x]".green()
    } else {
        "[ ]".white()
    }
}

/// A dot in the habit's own color, if it is a valid `#RRGGBB` value.
fn swatch(color: &str) -> ColoredString {
    let rgb = color
        .strip_prefix('#')
        .filter(|hex| hex.len() == 6)
        .and_then(|hex| u32::from_str_radix(hex, 16).ok());

    match rgb {
        Some(value) => {
            let [_, r, g, b] = value.to_be_bytes();
            "●".truecolor(r, g, b)
        }
        None => "●".normal(),
    }
}
