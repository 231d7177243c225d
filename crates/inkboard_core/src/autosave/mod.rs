//! Debounced persistence for the canvas and the open document.
//!
//! # Responsibility
//! - Coalesce bursts of mutation notifications into one durable write.
//! - Pull the snapshot at flush time so the write reflects the final state.
//!
//! # Invariants
//! - At most one pending flush deadline per sink instance; every new
//!   notification cancels and replaces it (trailing-edge debounce).
//! - A failed flush is reported, never retried by the sink itself; the next
//!   mutation's cycle is the retry.

pub mod debounce;
pub mod sink;

pub use debounce::{DebouncePolicy, DebouncedSink, DEFAULT_QUIET_PERIOD};
pub use sink::{
    CanvasSink, CanvasSnapshotSource, DocumentDraftSource, DocumentSink, FlushOutcome,
};
