//! Bandcamp Extractor main entry point
//!
//! This is the command-line interface for the Bandcamp link extractor.

use anyhow::Context;
use bandcamp_extractor::config::{load_config_with_hash, validate, Config};
use bandcamp_extractor::extractor::ExtractionRun;
use bandcamp_extractor::output::{default_output_path, print_summary};
use bandcamp_extractor::platform::{build_platform, parse_playlist_id};
use clap::Parser;
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Instant;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Exit status after an interrupt (128 + SIGINT)
const INTERRUPTED_EXIT_CODE: i32 = 130;

/// Bandcamp Extractor: collect Bandcamp links from a YouTube playlist
///
/// Reads the description of every video in the playlist, picks out links to
/// *.bandcamp.com pages and writes one CSV row per video as it finishes.
#[derive(Parser, Debug)]
#[command(name = "bandcamp-extractor")]
#[command(version = "1.0.0")]
#[command(about = "Extract Bandcamp links from YouTube playlist descriptions", long_about = None)]
struct Cli {
    /// YouTube playlist URL (must contain a list= parameter)
    #[arg(value_name = "PLAYLIST_URL")]
    playlist_url: String,

    /// Output CSV path (default: <playlist id>_bandcamp_links.csv)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Number of concurrent workers
    #[arg(short, long)]
    workers: Option<usize>,

    /// Videos per batch
    #[arg(long)]
    batch_size: Option<usize>,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Log file (appended to)
    #[arg(long, value_name = "FILE")]
    log_file: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Resolve the playlist and show what would be processed without fetching any video
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Configuration comes first: it names the log file
    let (mut config, config_hash) = match &cli.config {
        Some(path) => {
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("failed to load configuration {}", path.display()))?;
            (config, Some(hash))
        }
        None => (Config::default(), None),
    };
    apply_overrides(&mut config, &cli);
    validate(&config).context("invalid configuration")?;

    let log_path = cli
        .log_file
        .clone()
        .unwrap_or_else(|| PathBuf::from(&config.output.log_path));
    setup_logging(cli.verbose, cli.quiet, &log_path)?;

    if let (Some(path), Some(hash)) = (&cli.config, &config_hash) {
        tracing::info!(
            "Configuration loaded from {} (hash: {})",
            path.display(),
            hash
        );
    }

    let output_path = match &cli.output {
        Some(path) => path.clone(),
        None => default_output_path(&parse_playlist_id(&cli.playlist_url)?),
    };

    let platform = build_platform(&config.platform)?;
    let run = ExtractionRun::new(platform, &config);

    let videos = match run.resolve(&cli.playlist_url).await {
        Ok(videos) => videos,
        Err(e) => {
            tracing::error!("Failed to resolve playlist: {}", e);
            return Err(e.into());
        }
    };

    if cli.dry_run {
        handle_dry_run(&config, videos.len(), &output_path);
        return Ok(());
    }

    let started = Instant::now();
    let sink = run.open_sink(&output_path, videos.len())?;

    tokio::select! {
        counters = run.process(videos, Arc::clone(&sink)) => {
            print_summary(&counters, started.elapsed(), &output_path.display().to_string());
            Ok(())
        }
        _ = tokio::signal::ctrl_c() => {
            // Waits for an in-progress row, so the file ends on a complete row
            let counters = sink.close();
            tracing::warn!("Interrupted, partial results kept in {}", output_path.display());
            tracing::info!("Run stopped: {}", counters);
            print_summary(&counters, started.elapsed(), &output_path.display().to_string());
            std::process::exit(INTERRUPTED_EXIT_CODE);
        }
    }
}

/// Applies command-line overrides on top of the file configuration
fn apply_overrides(config: &mut Config, cli: &Cli) {
    if let Some(workers) = cli.workers {
        config.extractor.workers = workers;
    }
    if let Some(batch_size) = cli.batch_size {
        config.extractor.batch_size = batch_size;
    }
    if let Some(log_file) = &cli.log_file {
        config.output.log_path = log_file.display().to_string();
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
///
/// Console output goes to stderr; the same events are appended, without
/// colors, to the log file.
fn setup_logging(verbose: u8, quiet: bool, log_path: &Path) -> anyhow::Result<()> {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("bandcamp_extractor=info,warn"),
            1 => EnvFilter::new("bandcamp_extractor=debug,info"),
            2 => EnvFilter::new("bandcamp_extractor=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_path)
        .with_context(|| format!("failed to open log file {}", log_path.display()))?;

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_thread_ids(false)
                .with_file(false)
                .with_writer(std::io::stderr),
        )
        .with(
            fmt::layer()
                .with_ansi(false)
                .with_target(false)
                .with_writer(Mutex::new(log_file)),
        )
        .try_init()
        .context("failed to initialise logging")?;

    Ok(())
}

/// Handles the --dry-run mode: shows what would be processed
fn handle_dry_run(config: &Config, video_count: usize, output_path: &Path) {
    println!("=== Bandcamp Extractor Dry Run ===\n");

    println!("Extractor Configuration:");
    println!("  Workers: {}", config.extractor.workers);
    println!("  Batch size: {}", config.extractor.batch_size);
    println!("  Batch delay: {}ms", config.extractor.batch_delay_ms);
    println!("  Video timeout: {}s", config.extractor.video_timeout_secs);

    println!("\nPlatform:");
    println!("  Backend: {:?}", config.platform.backend);
    println!("  Retries: {}", config.platform.retries);

    println!("\n✓ Configuration is valid");
    println!(
        "✓ Would process {} videos in {} batches",
        video_count,
        video_count.div_ceil(config.extractor.batch_size.max(1))
    );
    println!("✓ Would write results to: {}", output_path.display());
}
