//! Habit statistics.
//!
//! Derives per-habit statistics and the dashboard built on them:
//! - Streaks, completion rate and "done today" (the engine)
//! - Snapshot collection and recomputation
//! - Overview totals
//! - XP, levels and achievements
//! - Heatmaps and sparklines

pub mod collector;
pub mod engine;
pub mod gamification;
pub mod overview;
pub mod visualization;

pub use collector::{CollectedData, StatsCollector};
pub use engine::{compute_stats, RATE_WINDOW_DAYS};
pub use gamification::{achievements, habit_xp, Achievement, XpSummary};
pub use overview::Overview;
pub use visualization::{
    daily_counts, intensity, render_heatmap, MAX_HEATMAP_WEEKS, render_progress_bar, render_sparkline,
    render_summary_box,
};
