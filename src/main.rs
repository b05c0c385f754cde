use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use reclaim_rs::{
    human_size, Category, CleaningConfiguration, ReclamationEngine, RunLog, Settings,
    StorageLayout,
};
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "reclaim-rs",
    version,
    about = "Reclaim disk space taken by caches and temp files"
)]
struct Cli {
    /// Settings file (defaults to <config dir>/reclaim-rs/settings.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Override the shared storage root
    #[arg(long, global = true)]
    storage_root: Option<PathBuf>,

    /// Increase log verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run one cleaning pass
    Run {
        /// Clean only these categories instead of the configured ones
        #[arg(long, value_enum, value_delimiter = ',')]
        only: Vec<Category>,

        /// Do not append the result to the run log
        #[arg(long)]
        no_log: bool,
    },
    /// Print the log of past runs
    History,
    /// Show access state, enabled categories and the run interval
    Status,
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_settings(cli: &Cli) -> Result<Settings> {
    let path = match &cli.config {
        Some(path) => path.clone(),
        None => Settings::default_path().context("cannot determine the config directory")?,
    };
    let mut settings = Settings::load(&path)?;
    if let Some(root) = &cli.storage_root {
        settings.paths.storage_root = Some(root.clone());
    }
    Ok(settings)
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let settings = load_settings(&cli)?;
    match &cli.command {
        Command::Run { only, no_log } => run(&settings, only, *no_log, cli.verbose),
        Command::History => history(&settings),
        Command::Status => status(&settings),
    }
}

fn run(settings: &Settings, only: &[Category], no_log: bool, verbose: u8) -> Result<()> {
    let config = if only.is_empty() {
        settings.categories
    } else {
        CleaningConfiguration::only(only)
    };
    let access = settings.access.resolve();
    if access.is_blind() {
        warn!("No file access granted; restricted caches will be skipped");
    }

    let layout = StorageLayout::new(settings.storage_root()?, settings.cache_dir()?);
    let engine = ReclamationEngine::new(layout);
    info!("Cleaning up under {}", engine.layout().storage_root.display());
    let (report, outcomes) = engine.run_detailed(&config, &access);

    if !no_log {
        let log = RunLog::new(settings.log_file()?);
        log.append(&report)
            .with_context(|| format!("failed to append to {}", log.path().display()))?;
    }

    println!("{report}");
    if verbose > 0 {
        for (category, outcome) in &outcomes {
            if outcome.is_empty() && !outcome.has_errors() {
                continue;
            }
            println!("\n{}:\n{}", category.label(), outcome.display_status());
        }
    }
    println!("Freed: {}", human_size(report.total()));
    if report.total() == 0 && access.full_access {
        println!("No junk found, or access is restricted by the system");
    }
    Ok(())
}

fn history(settings: &Settings) -> Result<()> {
    let log = RunLog::new(settings.log_file()?);
    let lines = log
        .read_all()
        .with_context(|| format!("failed to read {}", log.path().display()))?;
    if lines.is_empty() {
        println!("Log is empty");
    }
    for line in lines {
        println!("{line}");
    }
    Ok(())
}

fn status(settings: &Settings) -> Result<()> {
    let access = settings.access.resolve();
    println!("Platform version: {}", settings.access.platform_version);
    println!("Full access:      {}", if access.full_access { "granted" } else { "not granted" });
    println!("Data tree:        {}", access.data_tree.as_deref().unwrap_or("-"));
    println!("Media tree:       {}", access.media_tree.as_deref().unwrap_or("-"));
    println!("Run interval:     every {}h", settings.interval.hours());
    println!("Categories:");
    for category in Category::ALL {
        let mark = if settings.categories.is_enabled(category) { "✓" } else { "○" };
        println!("  [{mark}] {category}");
    }
    Ok(())
}
