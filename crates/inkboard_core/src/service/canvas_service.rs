//! Whiteboard snapshot use-case service.
//!
//! # Responsibility
//! - Load the stored board with graceful first-run/unreadable fallback.
//! - Delegate snapshot persistence to the canvas repository.

use crate::model::CanvasSnapshot;
use crate::repo::{CanvasRepository, RepoResult};
use log::warn;

/// Canvas service facade over repository implementations.
pub struct CanvasService<R: CanvasRepository> {
    repo: R,
}

impl<R: CanvasRepository> CanvasService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Loads the whiteboard snapshot.
    ///
    /// Missing or unreadable state becomes an empty board; the failure is
    /// logged and the canvas stays usable.
    pub fn load_canvas(&mut self) -> CanvasSnapshot {
        match self.repo.load_snapshot() {
            Ok(Some(snapshot)) => snapshot,
            Ok(None) => CanvasSnapshot::empty(),
            Err(err) => {
                warn!("event=canvas_load module=service status=fallback error={err}");
                CanvasSnapshot::empty()
            }
        }
    }

    /// Persists the whiteboard snapshot durably.
    pub fn save_canvas(&mut self, snapshot: &CanvasSnapshot) -> RepoResult<()> {
        self.repo.save_snapshot(snapshot)
    }
}
