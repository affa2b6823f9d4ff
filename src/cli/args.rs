use std::path::PathBuf;

use clap::{ArgGroup, Args, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use serde::{Deserialize, Serialize};

use crate::features::stats::MAX_HEATMAP_WEEKS;
use crate::habits::Frequency;

#[derive(Parser)]
#[command(name = "habitrack")]
#[command(about = "Track daily and weekly habits with streaks and completion rates")]
#[command(long_about = "habitrack - a habit tracker for the terminal

Record check-ins for your habits and see current streaks, longest streaks
and how much of the last 30 days' target you have met.

QUICK START:
  habitrack add \"Read 10 pages\"     Create a daily habit
  habitrack toggle 1                Mark habit 1 done today (again to undo)
  habitrack list                    Habits with their statistics
  habitrack stats                   Overview dashboard

OUTPUT FORMATS:
  --output pretty    Human-readable colored output (default)
  --output json      Machine-readable JSON for scripting

For more information on a specific command, run:
  habitrack <command> --help")]
#[command(version, propagate_version = true)]
pub struct Cli {
    /// Output format for command results
    ///
    /// Use 'pretty' for human-readable colored output,
    /// or 'json' for machine-readable output suitable for scripting.
    /// Defaults to `general.default_output` from the config file.
    #[arg(short, long, value_enum, global = true)]
    pub output: Option<OutputFormat>,

    /// Owner whose habits are shown and changed
    #[arg(long, env = "HABITRACK_OWNER", global = true)]
    pub owner: Option<String>,

    /// Database file (defaults to ~/.habitrack/habitrack.db)
    #[arg(long, env = "HABITRACK_DB", global = true)]
    pub db: Option<PathBuf>,

    /// Evaluate everything as of this instant (RFC 3339 or YYYY-MM-DD)
    #[arg(long, global = true, value_name = "TIMESTAMP")]
    pub now: Option<String>,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Output format for command results.
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable colored output.
    #[default]
    Pretty,
    /// Machine-readable JSON output.
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List habits with their statistics
    ///
    /// Newest habits first. Each line shows whether the habit is done
    /// today, the current streak and the 30-day completion rate.
    ///
    /// # Examples
    ///
    ///   habitrack list
    ///   habitrack ls -o json
    #[command(alias = "ls")]
    List,

    /// Show one habit in detail
    Show {
        /// Habit ID
        id: String,
    },

    /// Create a habit
    ///
    /// # Examples
    ///
    ///   habitrack add "Meditate"
    ///   habitrack add "Long run" --frequency weekly --color "#10B981"
    #[command(alias = "a")]
    Add(AddArgs),

    /// Change a habit's name, description, frequency or color
    ///
    /// Only the given fields change. Pass an empty description to clear it.
    Edit(EditArgs),

    /// Delete a habit and all of its completions
    #[command(alias = "rm")]
    Delete {
        /// Habit ID
        id: String,
    },

    /// Mark a day done, or undo it if already done
    ///
    /// # Examples
    ///
    ///   habitrack toggle 3
    ///   habitrack toggle 3 --day yesterday
    ///   habitrack toggle 3 --day 2024-06-01
    #[command(alias = "t")]
    Toggle {
        /// Habit ID
        id: String,

        /// Day to toggle: today, yesterday, "N days ago" or YYYY-MM-DD
        #[arg(long, short, default_value = "today")]
        day: String,
    },

    /// Turn a habit's reminder on or off
    Reminder(ReminderArgs),

    /// Statistics across all habits
    ///
    /// Without a subcommand, shows the overview dashboard.
    Stats(StatsArgs),

    /// Generate shell completions
    ///
    /// # Examples
    ///
    ///   habitrack completions zsh > ~/.zfunc/_habitrack
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,

        /// Print installation instructions instead of the script
        #[arg(long)]
        install: bool,
    },
}

/// Arguments for `add`.
#[derive(Args)]
pub struct AddArgs {
    /// Habit name
    pub name: String,

    /// How often the habit should be done
    #[arg(long, short, value_enum, default_value = "daily")]
    pub frequency: Frequency,

    /// Free-form description
    #[arg(long, short)]
    pub description: Option<String>,

    /// Display color as #RRGGBB
    #[arg(long, short)]
    pub color: Option<String>,
}

/// Arguments for `edit`.
#[derive(Args)]
pub struct EditArgs {
    /// Habit ID
    pub id: String,

    /// New name
    #[arg(long, short)]
    pub name: Option<String>,

    /// New description (empty to clear)
    #[arg(long, short)]
    pub description: Option<String>,

    /// New frequency
    #[arg(long, short, value_enum)]
    pub frequency: Option<Frequency>,

    /// New color as #RRGGBB
    #[arg(long, short)]
    pub color: Option<String>,
}

/// Arguments for `reminder`.
#[derive(Args)]
#[command(group(ArgGroup::new("state").required(true).args(["enable", "disable"])))]
pub struct ReminderArgs {
    /// Habit ID
    pub id: String,

    /// Turn the reminder on
    #[arg(long)]
    pub enable: bool,

    /// Turn the reminder off
    #[arg(long)]
    pub disable: bool,

    /// Reminder time as HH:MM (defaults to `habits.default_reminder_time`)
    #[arg(long, short)]
    pub time: Option<String>,
}

/// Arguments for `stats`.
#[derive(Args)]
pub struct StatsArgs {
    #[command(subcommand)]
    pub command: Option<StatsCommands>,
}

/// Statistics subcommands.
#[derive(Subcommand)]
pub enum StatsCommands {
    /// Habits tracked, done today, best streak and average completion
    Overview,

    /// Experience points and level
    Xp,

    /// Streak badges and their unlock state
    Achievements,

    /// Daily completion heatmap
    Heatmap {
        /// Number of weeks to show, 1-520 (defaults to `stats.heatmap_weeks`)
        #[arg(long, short, value_parser = clap::value_parser!(u32).range(1..=i64::from(MAX_HEATMAP_WEEKS)))]
        weeks: Option<u32>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_cli_list() {
        let cli = Cli::try_parse_from(["habitrack", "list"]).unwrap();
        assert!(matches!(cli.command, Commands::List));
        assert!(cli.output.is_none());
        assert!(!cli.verbose);
    }

    #[test]
    fn test_cli_global_flags() {
        let cli = Cli::try_parse_from([
            "habitrack",
            "ls",
            "-o",
            "json",
            "--owner",
            "alice",
            "--db",
            "/tmp/h.db",
            "--now",
            "2024-06-15T12:00:00Z",
            "-v",
        ])
        .unwrap();

        assert_eq!(cli.output, Some(OutputFormat::Json));
        assert_eq!(cli.owner.as_deref(), Some("alice"));
        assert_eq!(cli.db, Some(PathBuf::from("/tmp/h.db")));
        assert_eq!(cli.now.as_deref(), Some("2024-06-15T12:00:00Z"));
        assert!(cli.verbose);
    }

    #[test]
    fn test_cli_add_defaults() {
        let cli = Cli::try_parse_from(["habitrack", "add", "Read"]).unwrap();
        if let Commands::Add(args) = cli.command {
            assert_eq!(args.name, "Read");
            assert_eq!(args.frequency, Frequency::Daily);
            assert!(args.description.is_none());
            assert!(args.color.is_none());
        } else {
            panic!("Expected Add command");
        }
    }

    #[test]
    fn test_cli_add_with_options() {
        let cli = Cli::try_parse_from([
            "habitrack",
            "add",
            "Long run",
            "--frequency",
            "weekly",
            "--color",
            "#10B981",
            "-d",
            "Sunday mornings",
        ])
        .unwrap();
        if let Commands::Add(args) = cli.command {
            assert_eq!(args.frequency, Frequency::Weekly);
            assert_eq!(args.color.as_deref(), Some("#10B981"));
            assert_eq!(args.description.as_deref(), Some("Sunday mornings"));
        } else {
            panic!("Expected Add command");
        }
    }

    #[test]
    fn test_cli_edit() {
        let cli = Cli::try_parse_from(["habitrack", "edit", "4", "--name", "Walk", "-d", ""]).unwrap();
        if let Commands::Edit(args) = cli.command {
            assert_eq!(args.id, "4");
            assert_eq!(args.name.as_deref(), Some("Walk"));
            assert_eq!(args.description.as_deref(), Some(""));
            assert!(args.frequency.is_none());
        } else {
            panic!("Expected Edit command");
        }
    }

    #[test]
    fn test_cli_toggle_default_day() {
        let cli = Cli::try_parse_from(["habitrack", "toggle", "2"]).unwrap();
        if let Commands::Toggle { id, day } = cli.command {
            assert_eq!(id, "2");
            assert_eq!(day, "today");
        } else {
            panic!("Expected Toggle command");
        }
    }

    #[test]
    fn test_cli_reminder_requires_state() {
        assert!(Cli::try_parse_from(["habitrack", "reminder", "1"]).is_err());
        assert!(Cli::try_parse_from(["habitrack", "reminder", "1", "--enable", "--disable"]).is_err());

        let cli =
            Cli::try_parse_from(["habitrack", "reminder", "1", "--enable", "--time", "07:30"])
                .unwrap();
        if let Commands::Reminder(args) = cli.command {
            assert!(args.enable);
            assert!(!args.disable);
            assert_eq!(args.time.as_deref(), Some("07:30"));
        } else {
            panic!("Expected Reminder command");
        }
    }

    #[test]
    fn test_cli_stats_default() {
        let cli = Cli::try_parse_from(["habitrack", "stats"]).unwrap();
        if let Commands::Stats(args) = cli.command {
            assert!(args.command.is_none());
        } else {
            panic!("Expected Stats command");
        }
    }

    #[test]
    fn test_cli_stats_heatmap_weeks() {
        let cli = Cli::try_parse_from(["habitrack", "stats", "heatmap", "--weeks", "4"]).unwrap();
        if let Commands::Stats(args) = cli.command {
            assert!(matches!(
                args.command,
                Some(StatsCommands::Heatmap { weeks: Some(4) })
            ));
        } else {
            panic!("Expected Stats command");
        }
    }

    #[test]
    fn test_cli_stats_heatmap_weeks_bounded() {
        assert!(Cli::try_parse_from(["habitrack", "stats", "heatmap", "--weeks", "0"]).is_err());
        assert!(Cli::try_parse_from(["habitrack", "stats", "heatmap", "--weeks", "521"]).is_err());
        assert!(
            Cli::try_parse_from(["habitrack", "stats", "heatmap", "--weeks", "4000000000"]).is_err()
        );
        assert!(Cli::try_parse_from(["habitrack", "stats", "heatmap", "--weeks", "520"]).is_ok());
    }

    #[test]
    fn test_cli_completions() {
        let cli = Cli::try_parse_from(["habitrack", "completions", "bash"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Completions {
                shell: Shell::Bash,
                install: false
            }
        ));
    }

    #[test]
    fn test_cli_invalid_frequency() {
        assert!(Cli::try_parse_from(["habitrack", "add", "Read", "--frequency", "hourly"]).is_err());
    }
}
