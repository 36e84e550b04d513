//! Main entry point for the Partnership Elo rating tool
//!
//! Replays club game results through the rating engine, persists the final
//! rating table and reports how well ratings predict held-out match winners.

use anyhow::Result;
use clap::{Parser, Subcommand};
use partnership_elo::config::AppConfig;
use partnership_elo::evaluation::{EvaluationReport, SignalReport};
use partnership_elo::rating::{
    InMemoryRepository, JsonFileRepository, RatingRepository, RatingStore, RunSummary,
};
use partnership_elo::service::{ExperimentReport, RatingPipeline};
use std::path::PathBuf;
use tracing::{error, info};

/// Partnership Elo - skill ratings for duplicate bridge pairs
#[derive(Parser)]
#[command(
    name = "partnership-elo",
    version,
    about = "Partnership-pooled Elo ratings for duplicate bridge club players",
    long_about = "Partnership Elo replays historical board results in session order, \
                 updates every player with a pooled-partnership Elo rule, and compares \
                 the trained ratings against masterpoint totals on held-out sessions."
)]
struct Args {
    /// Configuration file path
    #[arg(
        short,
        long,
        value_name = "FILE",
        global = true,
        help = "Path to configuration file (TOML format)"
    )]
    config: Option<PathBuf>,

    /// Log level override
    #[arg(
        short,
        long,
        value_name = "LEVEL",
        global = true,
        help = "Override log level (trace, debug, info, warn, error)"
    )]
    log_level: Option<String>,

    /// Game data override
    #[arg(long, value_name = "PATH", global = true, help = "Override game file or directory")]
    games: Option<PathBuf>,

    /// Rating table override
    #[arg(long, value_name = "FILE", global = true, help = "Override rating table path")]
    ratings: Option<PathBuf>,

    /// Enable debug mode
    #[arg(short, long, global = true, help = "Enable debug mode with verbose logging")]
    debug: bool,

    /// Dry run mode (validate config and exit)
    #[arg(long, global = true, help = "Validate configuration and exit without rating")]
    dry_run: bool,

    /// Emit reports as JSON
    #[arg(long, global = true, help = "Print reports as JSON instead of text")]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Rate the training sessions and persist the rating table
    Train {
        /// Keep ratings in memory only
        #[arg(long)]
        no_persist: bool,
    },
    /// Score held-out sessions using a previously persisted rating table
    Evaluate,
    /// Train, persist and evaluate in one pass
    Run {
        /// Keep ratings in memory only
        #[arg(long)]
        no_persist: bool,
    },
}

/// Initialize structured logging with the configured level
fn init_logging(log_level: &str) -> Result<()> {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| log_level.into()),
        )
        .with_target(false)
        .with_line_number(true)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    Ok(())
}

/// Display startup banner with run information
fn display_startup_banner(config: &AppConfig) {
    info!("Partnership Elo");
    info!("   Service: {}", config.service.name);
    info!("   Log level: {}", config.service.log_level);
    info!("   Games: {}", config.storage.games_path.display());
    info!("   Ratings: {}", config.storage.ratings_path.display());
    info!(
        "   Baseline: {}  K: {}  Scale: {}",
        config.rating.baseline_rating, config.rating.k_factor, config.rating.update_scale
    );
    info!(
        "   Holdout fraction: {}",
        config.evaluation.holdout_fraction
    );
    info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
}

/// Load and merge configuration from file, environment and CLI arguments
fn load_config(args: &Args) -> Result<AppConfig> {
    let mut config = if let Some(config_path) = &args.config {
        info!("Loading configuration from: {}", config_path.display());
        AppConfig::from_file(config_path)?
    } else {
        AppConfig::from_env()?
    };

    if let Some(log_level) = &args.log_level {
        config.service.log_level = log_level.clone();
    }

    if args.debug {
        config.service.log_level = "debug".to_string();
    }

    if let Some(games) = &args.games {
        config.storage.games_path = games.clone();
    }

    if let Some(ratings) = &args.ratings {
        config.storage.ratings_path = ratings.clone();
    }

    Ok(config)
}

fn open_repository(config: &AppConfig, no_persist: bool) -> Box<dyn RatingRepository> {
    if no_persist {
        Box::new(InMemoryRepository::new())
    } else {
        Box::new(JsonFileRepository::new(config.storage.ratings_path.clone()))
    }
}

fn print_training(summary: &RunSummary) {
    println!(
        "Trained on {} matches ({} NS wins, {} EW wins, {} draws)",
        summary.matches_processed, summary.ns_wins, summary.ew_wins, summary.draws
    );
}

fn print_signal(report: &SignalReport) {
    println!(
        "  {:<14} accuracy {:.4} ({} correct, {} undefined, NS picked {:.4})",
        report.name, report.accuracy, report.correct, report.undefined, report.predicted_ns_rate
    );
    match &report.correlation {
        Some(c) => println!(
            "  {:<14} spearman rho {:.4}, p-value {:.4e}",
            "", c.rho, c.p_value
        ),
        None => println!("  {:<14} spearman undefined", ""),
    }
}

fn print_evaluation(report: &EvaluationReport) {
    println!(
        "Evaluated {} held-out matches ({} decided, {} drawn)",
        report.matches, report.decided, report.drawn
    );
    println!("  {:<14} NS win rate {:.4}", "baseline", report.ns_win_rate);
    print_signal(&report.rating);
    print_signal(&report.alternative);
}

fn emit<T: serde::Serialize>(json: bool, value: &T, text: impl FnOnce(&T)) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(value)?);
    } else {
        text(value);
    }
    Ok(())
}

fn execute(args: &Args, pipeline: &RatingPipeline) -> Result<()> {
    let config = pipeline.config();

    match args.command {
        Command::Train { no_persist } => {
            let stream = pipeline.load_stream()?;
            let split = pipeline.split(&stream)?;
            let mut repository = open_repository(config, no_persist);
            let (_, summary) = pipeline.train(&stream, &split, repository.as_mut())?;
            emit(args.json, &summary, print_training)
        }
        Command::Evaluate => {
            let stream = pipeline.load_stream()?;
            let split = pipeline.split(&stream)?;
            let repository = JsonFileRepository::new(config.storage.ratings_path.clone());
            let store = RatingStore::from_repository(&repository)?;
            let report = pipeline.evaluate(&stream, &split, &store)?;
            emit(args.json, &report, print_evaluation)
        }
        Command::Run { no_persist } => {
            let mut repository = open_repository(config, no_persist);
            let report = pipeline.run(repository.as_mut())?;
            emit(args.json, &report, |report: &ExperimentReport| {
                print_training(&report.training);
                println!(
                    "{} participants, {} skipped records, {} held-out sessions",
                    report.participants, report.skipped_records, report.holdout_sessions
                );
                print_evaluation(&report.evaluation);
            })
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    let config = load_config(&args).unwrap_or_else(|e| {
        eprintln!("Configuration error: {}", e);
        std::process::exit(1);
    });

    if let Err(e) = init_logging(&config.service.log_level) {
        eprintln!("Failed to initialize logging: {}", e);
        std::process::exit(1);
    }

    let pipeline = match RatingPipeline::new(config) {
        Ok(pipeline) => pipeline,
        Err(e) => {
            error!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };

    display_startup_banner(pipeline.config());

    if args.dry_run {
        info!("Dry run completed - exiting without rating");
        return Ok(());
    }

    if let Err(e) = execute(&args, &pipeline) {
        error!("Rating run failed: {:#}", e);
        std::process::exit(1);
    }

    Ok(())
}
