//! Whiteboard snapshot repository.
//!
//! The snapshot occupies a single fixed key outside the document namespace,
//! so canvas writes and document writes never contend for a slot.

use super::doc_repo::{RepoError, RepoResult};
use crate::model::CanvasSnapshot;
use crate::store::KvStore;
use serde_json::Value;

/// Storage key holding the whole whiteboard snapshot.
pub const CANVAS_SNAPSHOT_KEY: &str = "canvas.snapshot";

/// Repository interface for the whiteboard snapshot.
pub trait CanvasRepository {
    /// Loads the stored snapshot; `None` means no board was ever saved.
    fn load_snapshot(&mut self) -> RepoResult<Option<CanvasSnapshot>>;
    /// Persists the snapshot durably.
    fn save_snapshot(&mut self, snapshot: &CanvasSnapshot) -> RepoResult<()>;
}

/// Key-value-store-backed canvas repository.
pub struct KvCanvasRepository<'s> {
    store: &'s mut KvStore,
}

impl<'s> KvCanvasRepository<'s> {
    pub fn new(store: &'s mut KvStore) -> Self {
        Self { store }
    }
}

impl CanvasRepository for KvCanvasRepository<'_> {
    fn load_snapshot(&mut self) -> RepoResult<Option<CanvasSnapshot>> {
        match self.store.get(CANVAS_SNAPSHOT_KEY) {
            None => Ok(None),
            Some(Value::Null) => Ok(None),
            Some(value) => Ok(Some(CanvasSnapshot::new(value.clone()))),
        }
    }

    fn save_snapshot(&mut self, snapshot: &CanvasSnapshot) -> RepoResult<()> {
        self.store
            .set(CANVAS_SNAPSHOT_KEY, snapshot.as_value().clone());
        self.store.save().map_err(RepoError::from)?;
        Ok(())
    }
}
