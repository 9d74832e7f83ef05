//! Recency CLI - replay cache traces and report hit ratios

mod report;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use recency::{trace, LruCache};
use tracing::info;

use crate::report::{Format, Report};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Log at debug level (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Replay a trace against an empty cache
    Replay {
        /// Trace file
        #[arg(short, long)]
        trace: PathBuf,

        /// Cache capacity (number of items)
        #[arg(short, long, default_value_t = 1000)]
        capacity: usize,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = Format::Text)]
        format: Format,
    },

    /// Parse a trace without running it
    Check {
        /// Trace file
        #[arg(short, long)]
        trace: PathBuf,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Logs go to stderr so reports on stdout stay parseable
    let default_level = if args.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    match args.command {
        Command::Replay {
            trace,
            capacity,
            format,
        } => run_replay(&trace, capacity, format),
        Command::Check { trace } => run_check(&trace),
    }
}

fn run_replay(path: &Path, capacity: usize, format: Format) -> Result<()> {
    let mut cache = LruCache::new(capacity).context("Failed to create cache")?;
    let ops = trace::load_trace(path)
        .with_context(|| format!("Failed to load trace {}", path.display()))?;
    info!("Replaying {} operations with capacity {}", ops.len(), capacity);

    let run = trace::replay(&mut cache, &ops).context("Replay aborted")?;
    let report = Report::new(&cache, &run);

    let mut stdout = std::io::stdout().lock();
    report.write(&mut stdout, format)?;

    info!(
        "Replay finished: {} hits, {} misses",
        run.stats.hits, run.stats.misses
    );
    Ok(())
}

fn run_check(path: &Path) -> Result<()> {
    let ops = trace::load_trace(path)
        .with_context(|| format!("Failed to load trace {}", path.display()))?;

    println!("OK: {} operations", ops.len());
    Ok(())
}
