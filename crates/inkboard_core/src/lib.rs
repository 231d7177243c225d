//! Core domain logic for Inkboard.
//! This crate is the single source of truth for business invariants.

pub mod autosave;
pub mod board;
pub mod gesture;
pub mod logging;
pub mod model;
pub mod repo;
pub mod search;
pub mod service;
pub mod store;
pub mod workbench;

pub use autosave::{
    CanvasSink, CanvasSnapshotSource, DebouncePolicy, DebouncedSink, DocumentDraftSource,
    DocumentSink, FlushOutcome,
};
pub use board::{
    ButtonShape, CanvasTool, Cursor, DocButtonTool, ToolAction, ToolEffect, ToolRegistry,
    ToolRegistryError, BUTTON_DEFAULT_SIZE, BUTTON_MIN_SIZE, SELECT_TOOL_ID,
};
pub use gesture::{Activation, GestureConfig, GestureDisambiguator, Point, ThresholdPolicy};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::{
    CanvasSnapshot, DocId, DocIdError, DocumentRecord, DEFAULT_DOCUMENT_CONTENT,
    DEFAULT_DOCUMENT_TITLE,
};
pub use repo::{
    CanvasRepository, DocumentRepository, KvCanvasRepository, KvDocumentRepository, RepoError,
    RepoResult,
};
pub use search::{search_documents, SearchHit, SearchQuery, SearchResponse};
pub use service::{CanvasService, DocumentService, DocumentServiceError};
pub use store::{KvStore, StoreError, StoreResult};
pub use workbench::{OpenDocumentHandler, ViewState, Workbench};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
