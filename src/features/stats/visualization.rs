//! Terminal visualization for statistics.
//!
//! Provides sparklines, progress bars and a completion heatmap.

use chrono::{DateTime, Datelike, Days, NaiveDate, Utc};
use std::collections::HashMap;

use crate::core::DayBoundary;

/// Characters for sparkline rendering.
const BAR_CHARS: [char; 8] = [' ', '▁', '▂', '▃', '▄', '▅', '▆', '▇'];
const FULL_BLOCK: char = '█';

/// Heatmap cell glyphs by intensity level.
const HEAT_CHARS: [char; 5] = ['·', '░', '▒', '▓', '█'];

/// Widest heatmap accepted, about ten years.
pub const MAX_HEATMAP_WEEKS: u32 = 520;

/// Count completions per local day for the `days` days ending on `today`.
///
/// Returns one entry per day, oldest first, including empty days. Empty if
/// the range would start before the earliest representable date.
pub fn daily_counts<I>(
    completions: I,
    boundary: &DayBoundary,
    today: NaiveDate,
    days: usize,
) -> Vec<(NaiveDate, usize)>
where
    I: IntoIterator<Item = DateTime<Utc>>,
{
    let Some(start) = u64::try_from(days)
        .ok()
        .filter(|&d| d > 0)
        .and_then(|d| today.checked_sub_days(Days::new(d - 1)))
    else {
        return Vec::new();
    };
    let mut by_date: HashMap<NaiveDate, usize> = HashMap::new();
    for ts in completions {
        let day = boundary.day_of(ts);
        if day >= start && day <= today {
            *by_date.entry(day).or_default() += 1;
        }
    }

    start
        .iter_days()
        .take(days)
        .map(|d| (d, by_date.get(&d).copied().unwrap_or(0)))
        .collect()
}

/// Heat level for a day's completion count (0 = none, 4 = seven or more).
#[must_use]
pub const fn intensity(count: usize) -> usize {
    match count {
        0 => 0,
        1..=2 => 1,
        3..=4 => 2,
        5..=6 => 3,
        _ => 4,
    }
}

/// Render values as a one-line sparkline.
pub fn render_sparkline(values: &[usize]) -> String {
    if values.is_empty() {
        return String::new();
    }

    let max_value = values.iter().copied().max().unwrap_or(1).max(1);

    values
        .iter()
        .map(|&v| {
            let normalized = (v as f64 / max_value as f64 * 7.0) as usize;
            if v == 0 {
                BAR_CHARS[0]
            } else {
                BAR_CHARS[normalized.clamp(1, 7)]
            }
        })
        .collect()
}

/// Render a percentage as a progress bar, e.g. `[████░░░░] 50%`.
pub fn render_progress_bar(percent: f64, width: usize) -> String {
    let progress = (percent / 100.0).clamp(0.0, 1.0);
    let filled = (progress * width as f64).round() as usize;
    let empty = width - filled.min(width);

    format!(
        "[{}{}] {:.0}%",
        FULL_BLOCK.to_string().repeat(filled.min(width)),
        "░".repeat(empty),
        progress * 100.0
    )
}

/// Render a weekly heatmap from per-day counts.
///
/// Rows are weekdays (Mon-Sun), columns are weeks, oldest on the left.
pub fn render_heatmap(counts: &[(NaiveDate, usize)]) -> String {
    let Some(&(first, _)) = counts.first() else {
        return String::new();
    };

    let Some(grid_start) =
        first.checked_sub_days(Days::new(u64::from(first.weekday().num_days_from_monday())))
    else {
        return String::new();
    };
    let cell = |date: NaiveDate| -> (usize, usize) {
        let offset = (date - grid_start).num_days() as usize;
        (offset % 7, offset / 7)
    };

    let weeks = counts.last().map_or(1, |&(last, _)| cell(last).1 + 1);
    let mut grid = vec![vec![None; weeks]; 7];
    for &(date, count) in counts {
        let (row, col) = cell(date);
        grid[row][col] = Some(count);
    }

    let day_labels = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];
    let mut lines = Vec::with_capacity(9);

    for (label, row) in day_labels.iter().zip(&grid) {
        let cells: String = row
            .iter()
            .map(|c| match c {
                Some(count) => format!(" {} ", HEAT_CHARS[intensity(*count)]),
                None => "   ".to_string(),
            })
            .collect();
        lines.push(format!("{label} {cells}"));
    }

    lines.push(String::new());
    lines.push("Legend: · = 0  ░ = 1-2  ▒ = 3-4  ▓ = 5-6  █ = 7+".to_string());

    lines.join("\n")
}

/// Render a summary box with key metrics.
///
/// # Arguments
///
/// * `title` - Box title
/// * `items` - Vec of (label, value) pairs
///
/// # Returns
///
/// Multi-line string with a bordered box.
pub fn render_summary_box(title: &str, items: &[(&str, String)]) -> String {
    let max_label_len = items.iter().map(|(l, _)| l.chars().count()).max().unwrap_or(0);
    let max_value_len = items.iter().map(|(_, v)| v.chars().count()).max().unwrap_or(0);
    let content_width = max_label_len + max_value_len + 3; // " : "
    let title_len = title.chars().count();
    let box_width = content_width.max(title_len) + 4;

    let mut lines = Vec::new();

    lines.push(format!("┌{}┐", "─".repeat(box_width)));

    let title_padding = (box_width - title_len) / 2;
    lines.push(format!(
        "│{}{}{}│",
        " ".repeat(title_padding),
        title,
        " ".repeat(box_width - title_padding - title_len)
    ));

    lines.push(format!("├{}┤", "─".repeat(box_width)));

    for (label, value) in items {
        let item_str = format!("{label:>max_label_len$} : {value}");
        let padding = box_width.saturating_sub(item_str.chars().count() + 2);
        lines.push(format!("│ {}{} │", item_str, " ".repeat(padding)));
    }

    lines.push(format!("└{}┘", "─".repeat(box_width)));

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_daily_counts() {
        let boundary = DayBoundary::utc();
        let today = day(2024, 6, 15);
        let completions = vec![
            Utc.with_ymd_and_hms(2024, 6, 15, 8, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2024, 6, 15, 20, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2024, 6, 13, 8, 0, 0).unwrap(),
            // Outside the window
            Utc.with_ymd_and_hms(2024, 6, 1, 8, 0, 0).unwrap(),
        ];

        let counts = daily_counts(completions, &boundary, today, 7);
        assert_eq!(counts.len(), 7);
        assert_eq!(counts[0].0, day(2024, 6, 9));
        assert_eq!(counts[6], (today, 2));
        assert_eq!(counts[4], (day(2024, 6, 13), 1));
        assert_eq!(counts.iter().map(|(_, c)| c).sum::<usize>(), 3);
    }

    #[test]
    fn test_daily_counts_zero_days() {
        let counts = daily_counts(Vec::new(), &DayBoundary::utc(), day(2024, 6, 15), 0);
        assert!(counts.is_empty());
    }

    #[test]
    fn test_daily_counts_range_before_earliest_date() {
        let boundary = DayBoundary::utc();
        let today = day(2024, 6, 15);
        assert!(daily_counts(Vec::new(), &boundary, today, usize::MAX).is_empty());
        assert!(daily_counts(Vec::new(), &boundary, today, usize::MAX / 2).is_empty());
        assert!(daily_counts(Vec::new(), &boundary, NaiveDate::MIN, 2).is_empty());
        assert_eq!(daily_counts(Vec::new(), &boundary, NaiveDate::MIN, 1).len(), 1);
    }

    #[test]
    fn test_intensity_buckets() {
        assert_eq!(intensity(0), 0);
        assert_eq!(intensity(2), 1);
        assert_eq!(intensity(3), 2);
        assert_eq!(intensity(6), 3);
        assert_eq!(intensity(7), 4);
        assert_eq!(intensity(50), 4);
    }

    #[test]
    fn test_render_sparkline() {
        let values = [0, 2, 5, 3, 8, 4, 1];
        let sparkline = render_sparkline(&values);
        assert_eq!(sparkline.chars().count(), 7);
        assert!(sparkline.starts_with(' '));
    }

    #[test]
    fn test_render_sparkline_empty() {
        let sparkline = render_sparkline(&[]);
        assert!(sparkline.is_empty());
    }

    #[test]
    fn test_render_progress_bar() {
        assert!(render_progress_bar(50.0, 20).contains("50%"));
        assert!(render_progress_bar(100.0, 20).contains("100%"));
        assert!(render_progress_bar(0.0, 20).contains("0%"));
        assert!(render_progress_bar(250.0, 10).contains("100%"));
    }

    #[test]
    fn test_render_heatmap() {
        // Wednesday through the following Tuesday
        let counts: Vec<_> = day(2024, 6, 12)
            .iter_days()
            .take(7)
            .enumerate()
            .map(|(i, d)| (d, i))
            .collect();

        let heatmap = render_heatmap(&counts);
        let lines: Vec<&str> = heatmap.lines().collect();
        assert!(lines[0].starts_with("Mon"));
        assert!(lines[6].starts_with("Sun"));
        assert!(heatmap.contains('·'));
        assert!(heatmap.contains('▓'));
        assert!(heatmap.contains("Legend"));
    }

    #[test]
    fn test_render_heatmap_empty() {
        assert!(render_heatmap(&[]).is_empty());
    }

    #[test]
    fn test_render_summary_box() {
        let items = [
            ("Habits", "4".to_string()),
            ("Longest streak", "12 days".to_string()),
        ];
        let box_str = render_summary_box("Overview", &items);
        assert!(box_str.contains("Overview"));
        assert!(box_str.contains("12 days"));
        let widths: Vec<usize> = box_str.lines().map(|l| l.chars().count()).collect();
        assert!(widths.windows(2).all(|w| w[0] == w[1]));
    }
}
