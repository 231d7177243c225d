//! Store format migration registry and executor.
//!
//! # Responsibility
//! - Register format migrations in strictly increasing order.
//! - Upgrade loaded entries before any repository reads them.
//!
//! # Invariants
//! - `version` values must remain monotonic.
//! - The applied version is mirrored to the reserved `store.format_version`
//!   key; the upgraded document reaches disk on the next `save()`.

use super::{StoreError, StoreResult, FORMAT_VERSION_KEY};
use serde_json::{Map, Value};

#[derive(Clone, Copy)]
struct Migration {
    version: u32,
    apply: fn(&mut Map<String, Value>),
}

const MIGRATIONS: &[Migration] = &[Migration {
    version: 2,
    apply: migrate_flat_keys_to_namespaced,
}];

/// Format version written by stores that predate the version key.
const INITIAL_VERSION: u32 = 1;

/// Returns the latest format version known by this binary.
pub fn latest_version() -> u32 {
    MIGRATIONS
        .last()
        .map_or(INITIAL_VERSION, |migration| migration.version)
}

/// Applies all pending migrations to loaded store entries.
pub fn apply_migrations(entries: &mut Map<String, Value>) -> StoreResult<()> {
    let current = current_version(entries);
    let latest = latest_version();

    if current > latest {
        return Err(StoreError::UnsupportedFormatVersion {
            file_version: current,
            latest_supported: latest,
        });
    }

    for migration in MIGRATIONS {
        if migration.version <= current {
            continue;
        }
        (migration.apply)(entries);
    }

    entries.insert(FORMAT_VERSION_KEY.to_string(), Value::from(latest));
    Ok(())
}

fn current_version(entries: &Map<String, Value>) -> u32 {
    if let Some(version) = entries
        .get(FORMAT_VERSION_KEY)
        .and_then(Value::as_u64)
    {
        return u32::try_from(version).unwrap_or(u32::MAX);
    }

    // A brand-new store starts at the latest version; a non-empty file
    // without a version key predates versioning.
    if entries.is_empty() {
        latest_version()
    } else {
        INITIAL_VERSION
    }
}

/// v1 -> v2: the first store format used one flat key per surface. Move
/// those entries under the namespaced keys so a single flat key space can
/// hold many documents without aliasing.
fn migrate_flat_keys_to_namespaced(entries: &mut Map<String, Value>) {
    if let Some(snapshot) = entries.remove("canvas-data") {
        entries.entry("canvas.snapshot").or_insert(snapshot);
    }
    if let Some(content) = entries.remove("document-data") {
        entries.entry("doc.default.content").or_insert(content);
    }
    if let Some(title) = entries.remove("document-title") {
        entries.entry("doc.default.title").or_insert(title);
    }
}

#[cfg(test)]
mod tests {
    use super::{apply_migrations, latest_version, FORMAT_VERSION_KEY};
    use serde_json::{Map, Value};

    #[test]
    fn versions_are_strictly_increasing() {
        let mut previous = 1;
        for migration in super::MIGRATIONS {
            assert!(migration.version > previous);
            previous = migration.version;
        }
    }

    #[test]
    fn empty_store_starts_at_latest_version() {
        let mut entries = Map::new();
        apply_migrations(&mut entries).expect("empty store migrates");
        assert_eq!(
            entries.get(FORMAT_VERSION_KEY).and_then(Value::as_u64),
            Some(u64::from(latest_version()))
        );
    }

    #[test]
    fn flat_legacy_keys_move_under_namespaces() {
        let mut entries = Map::new();
        entries.insert("canvas-data".to_string(), Value::from("snapshot"));
        entries.insert("document-data".to_string(), Value::from("<p>body</p>"));

        apply_migrations(&mut entries).expect("legacy store migrates");

        assert!(entries.get("canvas-data").is_none());
        assert_eq!(entries.get("canvas.snapshot"), Some(&Value::from("snapshot")));
        assert_eq!(
            entries.get("doc.default.content"),
            Some(&Value::from("<p>body</p>"))
        );
    }

    #[test]
    fn newer_format_version_is_rejected() {
        let mut entries = Map::new();
        entries.insert(
            FORMAT_VERSION_KEY.to_string(),
            Value::from(latest_version() + 1),
        );
        let err = apply_migrations(&mut entries).expect_err("newer version must fail");
        assert!(err.to_string().contains("newer than supported"));
    }
}
