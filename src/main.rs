use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use habitrack::cli::args::{Cli, Commands};
use habitrack::cli::commands::{self, Context};
use habitrack::config::{ColorSetting, Config, Paths};
use habitrack::core::{parse_timestamp, Clock, SystemClock};
use habitrack::error::HabitError;
use habitrack::storage::HabitStorage;

/// Environment variable holding the log filter.
const LOG_ENV: &str = "HABITRACK_LOG";

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {e:#}", "error".red().bold());
        let code = e.downcast_ref::<HabitError>().map_or(1, HabitError::exit_code);
        std::process::exit(code);
    }
}

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(if verbose { "debug" } else { "warn" }));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let paths = Paths::new()?;
    let config = Config::load_from_path(&paths.config_file)?;
    match config.general.color {
        ColorSetting::Always => colored::control::set_override(true),
        ColorSetting::Never => colored::control::set_override(false),
        ColorSetting::Auto => {},
    }

    if let Commands::Completions { shell, install } = cli.command {
        println!("{}", commands::completions(shell, install)?);
        return Ok(());
    }

    let format = cli.output.unwrap_or(config.general.default_output);
    let boundary = config.general.day_boundary()?;
    let now = match cli.now.as_deref() {
        Some(input) => parse_timestamp(input, &boundary)?,
        None => SystemClock.now(),
    };

    let db_path = match cli.db {
        Some(path) => path,
        None => {
            paths.ensure_dirs()?;
            paths.database.clone()
        },
    };
    debug!(db = %db_path.display(), %now, "starting");
    let store = HabitStorage::open_at(&db_path)?;

    let ctx = Context {
        store: &store,
        owner: cli.owner.or_else(|| config.general.owner.clone()),
        now,
        boundary,
        format,
        config,
    };

    let output = match cli.command {
        Commands::List => commands::list(&ctx)?,
        Commands::Show { id } => commands::show(&ctx, &id)?,
        Commands::Add(args) => commands::add(&ctx, args)?,
        Commands::Edit(args) => commands::edit(&ctx, args)?,
        Commands::Delete { id } => commands::delete(&ctx, &id)?,
        Commands::Toggle { id, day } => commands::toggle(&ctx, &id, &day)?,
        Commands::Reminder(args) => commands::reminder(&ctx, args)?,
        Commands::Stats(args) => commands::stats(&ctx, args.command)?,
        Commands::Completions { shell, install } => commands::completions(shell, install)?,
    };

    if !output.is_empty() {
        println!("{output}");
    }
    Ok(())
}
