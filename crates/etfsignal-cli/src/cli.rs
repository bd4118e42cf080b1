//! CLI argument definitions for etfsignal.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `update` | Fetch data for the universe and upsert today's snapshot |
//! | `show` | Print one date's snapshot rows |
//! | `dates` | List recorded snapshot dates |
//! | `cache clear` | Drop the persisted fee cache |
//!
//! # Exit codes
//!
//! `update` exits non-zero only when the whole batch fails or the history
//! file cannot be written; per-fund failures are reported and exit 0.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// ETF signal pipeline: daily MA60 + weekly MACD snapshots for a fund
/// universe.
#[derive(Debug, Parser)]
#[command(
    name = "etfsignal",
    author,
    version,
    about = "ETF signal pipeline: fetch, compute, snapshot"
)]
pub struct Cli {
    /// Data directory (default: $ETFSIGNAL_HOME or ~/.etfsignal).
    #[arg(long, global = true)]
    pub home: Option<PathBuf>,

    /// Emit machine-readable JSON instead of text output.
    #[arg(long, global = true, default_value_t = false)]
    pub json: bool,

    /// Enable debug-level logging.
    #[arg(long, global = true, default_value_t = false)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the pipeline for one trading date and upsert the snapshot.
    Update(UpdateArgs),

    /// Print the snapshot rows recorded for a date.
    Show(ShowArgs),

    /// List all dates present in the historical record.
    Dates,

    /// Fee cache management.
    Cache(CacheArgs),
}

/// Arguments for the `update` command.
#[derive(Debug, Args)]
pub struct UpdateArgs {
    /// Universe file: CSV lines of `code,name` (names optional).
    #[arg(long)]
    pub universe: PathBuf,

    /// Snapshot date (default: today, UTC).
    #[arg(long)]
    pub as_of: Option<String>,

    /// Concurrent fetch workers (clamped to 1..=16).
    #[arg(long, default_value_t = etfsignal_core::DEFAULT_WORKERS)]
    pub workers: usize,
}

/// Arguments for the `show` command.
#[derive(Debug, Args)]
pub struct ShowArgs {
    /// Date to print (default: latest recorded date).
    #[arg(long)]
    pub date: Option<String>,
}

/// Arguments for the `cache` command group.
#[derive(Debug, Args)]
pub struct CacheArgs {
    #[command(subcommand)]
    pub command: CacheCommand,
}

/// Fee cache subcommands.
#[derive(Debug, Subcommand)]
pub enum CacheCommand {
    /// Drop every cached fee entry so the next run re-fetches them.
    Clear,
}
