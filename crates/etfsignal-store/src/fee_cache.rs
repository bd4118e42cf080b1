//! Persistent fund fee cache.
//!
//! Fee rates change at most a few times a year, so they are fetched once and
//! kept in a JSON file that survives restarts. The cache is loaded once at
//! process start and flushed once after a batch; there is no per-write
//! durability and no automatic eviction.

use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;

use crate::StoreError;

/// Annual fee rates for one fund, in percent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeeRecord {
    /// Management fee rate (e.g. 0.5 for 0.50% p.a.).
    pub management_rate: f64,
    /// Custody fee rate.
    pub custody_rate: f64,
}

/// In-memory fee map backed by a JSON file.
///
/// Reads are cheap clones out of the map; writers serialize on an internal
/// mutex so the cache can be shared across concurrent fetch tasks.
pub struct FeeCache {
    path: PathBuf,
    entries: Mutex<BTreeMap<String, FeeRecord>>,
}

impl FeeCache {
    /// Load the cache from `path`.
    ///
    /// A missing file yields an empty cache. An unreadable or corrupt file
    /// also yields an empty cache, with a warning: cache trouble degrades a
    /// run (everything is re-fetched), it never aborts one.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = match fs::read_to_string(&path) {
            Ok(raw) => match serde_json::from_str::<BTreeMap<String, FeeRecord>>(&raw) {
                Ok(map) => map,
                Err(error) => {
                    tracing::warn!(path = %path.display(), %error, "fee cache is corrupt; starting empty");
                    BTreeMap::new()
                }
            },
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(error) => {
                tracing::warn!(path = %path.display(), %error, "fee cache is unreadable; starting empty");
                BTreeMap::new()
            }
        };

        Self {
            path,
            entries: Mutex::new(entries),
        }
    }

    /// Create an empty cache that will flush to `path`.
    pub fn empty(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            entries: Mutex::new(BTreeMap::new()),
        }
    }

    /// Look up the cached fee record for a fund code.
    pub fn get(&self, code: &str) -> Option<FeeRecord> {
        let entries = self.entries.lock().expect("fee cache lock is not poisoned");
        entries.get(code).cloned()
    }

    /// Insert or replace the fee record for a fund code.
    pub fn put(&self, code: impl Into<String>, record: FeeRecord) {
        let mut entries = self.entries.lock().expect("fee cache lock is not poisoned");
        entries.insert(code.into(), record);
    }

    /// Drop every cached entry. The next run re-fetches all fees; this is the
    /// manual refresh path, nothing expires on its own.
    pub fn clear(&self) {
        let mut entries = self.entries.lock().expect("fee cache lock is not poisoned");
        entries.clear();
    }

    /// Number of cached entries.
    pub fn len(&self) -> usize {
        let entries = self.entries.lock().expect("fee cache lock is not poisoned");
        entries.len()
    }

    /// Whether the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Persist the full map: write to a temp file in the target directory,
    /// then rename over the cache file so a crash cannot truncate it.
    pub fn flush(&self) -> Result<(), StoreError> {
        let serialized = {
            let entries = self.entries.lock().expect("fee cache lock is not poisoned");
            serde_json::to_string_pretty(&*entries)?
        };

        let dir = self.path.parent().unwrap_or_else(|| Path::new("."));
        fs::create_dir_all(dir)?;

        let mut staged = NamedTempFile::new_in(dir)?;
        staged.write_all(serialized.as_bytes())?;
        staged.flush()?;
        staged
            .persist(&self.path)
            .map_err(|error| StoreError::Io(error.error))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn sample_fee() -> FeeRecord {
        FeeRecord {
            management_rate: 0.5,
            custody_rate: 0.1,
        }
    }

    #[test]
    fn missing_file_loads_empty() {
        let temp = tempdir().expect("tempdir");
        let cache = FeeCache::load(temp.path().join("fees.json"));
        assert!(cache.is_empty());
    }

    #[test]
    fn corrupt_file_loads_empty() {
        let temp = tempdir().expect("tempdir");
        let path = temp.path().join("fees.json");
        fs::write(&path, "{not json").expect("write corrupt file");

        let cache = FeeCache::load(&path);
        assert!(cache.is_empty());
    }

    #[test]
    fn flush_then_reload_round_trips() {
        let temp = tempdir().expect("tempdir");
        let path = temp.path().join("fees.json");

        let cache = FeeCache::load(&path);
        cache.put("510300", sample_fee());
        cache.put("159915", FeeRecord { management_rate: 0.15, custody_rate: 0.05 });
        cache.flush().expect("flush");

        let reloaded = FeeCache::load(&path);
        assert_eq!(reloaded.len(), 2);
        assert_eq!(reloaded.get("510300"), Some(sample_fee()));
        assert_eq!(
            reloaded.get("159915"),
            Some(FeeRecord { management_rate: 0.15, custody_rate: 0.05 })
        );
    }

    #[test]
    fn flush_creates_missing_parent_directories() {
        let temp = tempdir().expect("tempdir");
        let path = temp.path().join("nested").join("deeper").join("fees.json");

        let cache = FeeCache::empty(&path);
        cache.put("513100", sample_fee());
        cache.flush().expect("flush into nested dir");

        assert_eq!(FeeCache::load(&path).get("513100"), Some(sample_fee()));
    }

    #[test]
    fn clear_empties_the_map() {
        let temp = tempdir().expect("tempdir");
        let cache = FeeCache::empty(temp.path().join("fees.json"));
        cache.put("510300", sample_fee());
        cache.clear();
        assert!(cache.get("510300").is_none());
    }
}
