//! Historical snapshot record.
//!
//! One CSV file holds every per-fund row ever produced, keyed by
//! `(date, code)`. Re-running a date replaces exactly that date's rows and
//! leaves the rest of the history untouched. The header and column order are
//! stable so the file stays consumable by plain append-only tooling.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;

use crate::StoreError;

/// One flattened snapshot row as it appears in the history file.
///
/// Indicator columns are `None`/empty when a fund did not have enough history
/// on that date; the enum-like columns (`ma_relation`, `ma_cross`,
/// `macd_flip`) carry the lowercase wire strings produced by
/// `etfsignal-core`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotRecord {
    /// Trading date, ISO `YYYY-MM-DD`.
    pub date: String,
    /// Fund code.
    pub code: String,
    /// Display name.
    pub name: String,
    /// Annual management fee rate in percent, when known.
    pub management_rate: Option<f64>,
    /// Annual custody fee rate in percent, when known.
    pub custody_rate: Option<f64>,
    /// Latest daily close.
    pub latest_close: Option<f64>,
    /// 60-day simple moving average of the close.
    pub ma60: Option<f64>,
    /// Close vs. MA60: `above`, `below`, `equal` or `unavailable`.
    pub ma_relation: String,
    /// `cross_up` / `cross_down` when the relation flipped between the last
    /// two sessions, empty otherwise.
    pub ma_cross: String,
    /// Weekly MACD DIF at the latest bar.
    pub macd_dif: Option<f64>,
    /// Weekly MACD DEA at the latest bar.
    pub macd_dea: Option<f64>,
    /// Weekly MACD histogram (2 × (DIF − DEA)).
    pub macd_histogram: Option<f64>,
    /// `turned_positive` / `turned_negative` when the histogram changed sign,
    /// empty otherwise.
    pub macd_flip: String,
}

/// CSV-backed store with replace-or-append semantics per date.
pub struct SnapshotStore {
    path: PathBuf,
}

impl SnapshotStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Replace all rows for `date` with `rows`, leaving other dates intact.
    ///
    /// Calling this twice with the same arguments leaves the file identical
    /// to calling it once. An empty `rows` slice is a no-op: the previous
    /// content of the record (including any prior rows for `date`) is kept,
    /// and a run with nothing to persist reports its failures elsewhere.
    pub fn upsert(&self, date: &str, rows: &[SnapshotRecord]) -> Result<(), StoreError> {
        if rows.is_empty() {
            return Ok(());
        }

        for row in rows {
            if row.date != date {
                return Err(StoreError::DateMismatch {
                    row_date: row.date.clone(),
                    expected: date.to_owned(),
                });
            }
        }

        let mut records = self.load_all()?;
        records.retain(|record| record.date != date);
        records.extend_from_slice(rows);
        // Stable sort keeps per-date insertion order while the ISO date
        // strings sort chronologically.
        records.sort_by(|a, b| a.date.cmp(&b.date));

        self.write_all(&records)
    }

    /// Read all rows recorded for `date`, in stored order. Empty when the
    /// date (or the whole file) is absent.
    pub fn read(&self, date: &str) -> Result<Vec<SnapshotRecord>, StoreError> {
        let records = self.load_all()?;
        Ok(records
            .into_iter()
            .filter(|record| record.date == date)
            .collect())
    }

    /// All recorded dates, ascending, deduplicated.
    pub fn all_dates(&self) -> Result<Vec<String>, StoreError> {
        let records = self.load_all()?;
        let mut dates: Vec<String> = records.into_iter().map(|record| record.date).collect();
        dates.sort();
        dates.dedup();
        Ok(dates)
    }

    fn load_all(&self) -> Result<Vec<SnapshotRecord>, StoreError> {
        let raw = match fs::read(&self.path) {
            Ok(raw) => raw,
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(error) => return Err(StoreError::Io(error)),
        };

        let mut reader = csv::Reader::from_reader(raw.as_slice());
        let mut records = Vec::new();
        for row in reader.deserialize() {
            records.push(row?);
        }
        Ok(records)
    }

    fn write_all(&self, records: &[SnapshotRecord]) -> Result<(), StoreError> {
        let dir = self.path.parent().unwrap_or_else(|| Path::new("."));
        fs::create_dir_all(dir)?;

        let staged = NamedTempFile::new_in(dir)?;
        {
            let mut writer = csv::Writer::from_writer(staged.as_file());
            for record in records {
                writer.serialize(record)?;
            }
            writer.flush()?;
        }
        staged.as_file().sync_all()?;
        staged
            .persist(&self.path)
            .map_err(|error| StoreError::Io(error.error))?;
        Ok(())
    }
}
