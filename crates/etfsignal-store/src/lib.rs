//! # etfsignal-store
//!
//! Flat-file persistence for the etfsignal pipeline.
//!
//! Two stores live here:
//!
//! | Store | File | Format |
//! |-------|------|--------|
//! | [`FeeCache`] | `<home>/fees.json` | JSON map `code -> fee record` |
//! | [`SnapshotStore`] | `<home>/history.csv` | CSV, one row per `(date, code)` |
//!
//! Both write through a temp file in the target directory followed by an
//! atomic rename, so a crash mid-write never truncates the previous file.
//! The history file keeps a stable header and column order so external
//! append-only tooling can read it across versions.
//!
//! This crate speaks flat records (strings and numbers); the rich domain
//! types live in `etfsignal-core`, which depends on and re-exports this
//! crate.

pub mod fee_cache;
pub mod snapshot;

use std::env;
use std::path::PathBuf;

use thiserror::Error;

pub use fee_cache::{FeeCache, FeeRecord};
pub use snapshot::{SnapshotRecord, SnapshotStore};

/// Errors raised by the persistence layer.
#[derive(Debug, Error)]
pub enum StoreError {
    /// I/O error (file system operations).
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// CSV parse or write error in the history file.
    #[error(transparent)]
    Csv(#[from] csv::Error),

    /// Fee cache (de)serialization error.
    #[error("fee cache serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A row handed to `upsert` carries a different date than the upsert target.
    #[error("snapshot row dated '{row_date}' does not match upsert date '{expected}'")]
    DateMismatch { row_date: String, expected: String },
}

/// Resolved locations for the on-disk stores.
#[derive(Debug, Clone)]
pub struct StorePaths {
    /// Root directory for etfsignal data.
    pub home: PathBuf,
}

impl StorePaths {
    /// Resolve the data directory: explicit override, `ETFSIGNAL_HOME`,
    /// `$HOME/.etfsignal`, or `./.etfsignal` as a last resort.
    pub fn resolve(explicit: Option<PathBuf>) -> Self {
        let home = explicit.unwrap_or_else(resolve_home);
        Self { home }
    }

    /// Path of the persisted fee cache.
    pub fn fee_cache(&self) -> PathBuf {
        self.home.join("fees.json")
    }

    /// Path of the historical snapshot record.
    pub fn history(&self) -> PathBuf {
        self.home.join("history.csv")
    }
}

fn resolve_home() -> PathBuf {
    if let Some(path) = env::var_os("ETFSIGNAL_HOME") {
        let path = PathBuf::from(path);
        if !path.as_os_str().is_empty() {
            return path;
        }
    }

    if let Some(home) = env::var_os("HOME") {
        return PathBuf::from(home).join(".etfsignal");
    }

    PathBuf::from(".etfsignal")
}
