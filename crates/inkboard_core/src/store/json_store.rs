//! Flat key-value store persisted as one JSON document on disk.
//!
//! # Responsibility
//! - Load the store file (or start empty when it does not exist yet).
//! - Provide `get`/`set`/`remove`/prefix-listing over string keys.
//! - Flush the full document durably via an atomic temp-file swap.
//!
//! # Invariants
//! - A missing store file is "no prior data", never an error.
//! - `save()` either replaces the file completely or leaves it untouched.
//! - Migrations are applied before any caller sees the entries.

use super::migrations::{apply_migrations, latest_version};
use super::{StoreError, StoreResult};
use log::{error, info};
use serde_json::{Map, Value};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Reserved key carrying the store format version.
pub const FORMAT_VERSION_KEY: &str = "store.format_version";

/// JSON-backed key-value store with an optional on-disk backing file.
///
/// The in-memory variant backs tests and probes; `save()` on it is a no-op
/// that reports success, mirroring how a file-backed store behaves once the
/// write has completed.
#[derive(Debug)]
pub struct KvStore {
    entries: Map<String, Value>,
    path: Option<PathBuf>,
}

impl KvStore {
    /// Opens the store file at `path` and applies all pending migrations.
    ///
    /// A missing file yields an empty store at the latest format version.
    /// Migrated entries live in memory until the next `save()`.
    ///
    /// # Side effects
    /// - Emits `store_open` logging events with duration and status.
    ///
    /// # Errors
    /// - `Corrupt` when the file exists but is not a JSON object.
    /// - `UnsupportedFormatVersion` when the file was written by a newer build.
    /// - `Io` on any filesystem failure other than "not found".
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let started_at = Instant::now();
        info!("event=store_open module=store status=start mode=file");

        let path = path.as_ref().to_path_buf();
        let result = Self::open_inner(&path);
        match &result {
            Ok(store) => info!(
                "event=store_open module=store status=ok mode=file duration_ms={} entries={}",
                started_at.elapsed().as_millis(),
                store.entries.len()
            ),
            Err(err) => error!(
                "event=store_open module=store status=error mode=file duration_ms={} error={}",
                started_at.elapsed().as_millis(),
                err
            ),
        }
        result
    }

    fn open_inner(path: &Path) -> StoreResult<Self> {
        let entries = match std::fs::read(path) {
            Ok(bytes) => parse_entries(&bytes)?,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Map::new(),
            Err(err) => return Err(err.into()),
        };

        let mut store = Self {
            entries,
            path: Some(path.to_path_buf()),
        };
        apply_migrations(&mut store.entries)?;
        Ok(store)
    }

    /// Creates an unbacked store for tests and smoke probes.
    ///
    /// Already carries the latest format version; `save()` reports success
    /// without touching the filesystem.
    pub fn in_memory() -> Self {
        let mut entries = Map::new();
        entries.insert(
            FORMAT_VERSION_KEY.to_string(),
            Value::from(latest_version()),
        );
        Self {
            entries,
            path: None,
        }
    }

    /// Returns the value stored under `key`, or `None` when absent.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    /// Stores `value` under `key`, replacing any previous value.
    pub fn set(&mut self, key: impl Into<String>, value: Value) {
        self.entries.insert(key.into(), value);
    }

    /// Removes `key` and returns its previous value, if any.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.entries.remove(key)
    }

    /// Returns all non-reserved keys starting with `prefix`, sorted.
    pub fn keys_with_prefix(&self, prefix: &str) -> Vec<String> {
        let mut keys: Vec<String> = self
            .entries
            .keys()
            .filter(|key| key.starts_with(prefix) && key.as_str() != FORMAT_VERSION_KEY)
            .cloned()
            .collect();
        keys.sort();
        keys
    }

    /// Number of entries, reserved keys included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Flushes the full document to the backing file.
    ///
    /// Writes to a sibling temp file, syncs it, then renames it over the
    /// target so a crash mid-write never leaves a truncated store behind.
    /// Completes or fails before returning; there is no background write.
    pub fn save(&self) -> StoreResult<()> {
        let Some(path) = self.path.as_deref() else {
            return Ok(());
        };

        let started_at = Instant::now();
        match self.save_to(path) {
            Ok(()) => {
                info!(
                    "event=store_save module=store status=ok duration_ms={} entries={}",
                    started_at.elapsed().as_millis(),
                    self.entries.len()
                );
                Ok(())
            }
            Err(err) => {
                error!(
                    "event=store_save module=store status=error duration_ms={} error={}",
                    started_at.elapsed().as_millis(),
                    err
                );
                Err(err)
            }
        }
    }

    fn save_to(&self, path: &Path) -> StoreResult<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let bytes = serde_json::to_vec_pretty(&self.entries)
            .map_err(|err| StoreError::Corrupt(err.to_string()))?;

        let tmp_path = temp_sibling(path);
        let mut file = std::fs::File::create(&tmp_path)?;
        file.write_all(&bytes)?;
        file.sync_all()?;
        drop(file);

        if let Err(err) = std::fs::rename(&tmp_path, path) {
            let _ = std::fs::remove_file(&tmp_path);
            return Err(err.into());
        }
        Ok(())
    }

    /// Backing file path, when this store is persistent.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}

fn parse_entries(bytes: &[u8]) -> StoreResult<Map<String, Value>> {
    let value: Value = serde_json::from_slice(bytes)
        .map_err(|err| StoreError::Corrupt(err.to_string()))?;
    match value {
        Value::Object(map) => Ok(map),
        other => Err(StoreError::Corrupt(format!(
            "expected top-level object, found {}",
            json_kind(&other)
        ))),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn temp_sibling(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|name| name.to_os_string())
        .unwrap_or_else(|| "store".into());
    name.push(".tmp");
    path.with_file_name(name)
}
