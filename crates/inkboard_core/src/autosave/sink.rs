//! Autosave sinks binding the debounce machine to repositories.
//!
//! One sink per persisted surface: the whiteboard and the open document.
//! Sinks across surfaces are independent; their writes touch disjoint keys,
//! so no ordering between them is required or enforced.

use super::debounce::{DebouncePolicy, DebouncedSink};
use crate::model::{CanvasSnapshot, DocId};
use crate::repo::{CanvasRepository, DocumentRepository};
use crate::service::{CanvasService, DocumentService, DocumentServiceError};
use log::error;
use std::time::Instant;

/// Result of one flush attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlushOutcome {
    /// The snapshot was captured and written durably.
    Flushed,
    /// No flush was due; nothing was captured or written.
    NotDue,
    /// The write failed; reported here and in the log, not retried.
    Failed,
}

/// Capability to pull the whiteboard's current full state at flush time.
///
/// The snapshot is captured when the flush runs, not when it was scheduled,
/// so the write always reflects the last mutation of a burst.
pub trait CanvasSnapshotSource {
    fn current_snapshot(&self) -> CanvasSnapshot;
}

/// Capability to pull the open document's current draft at flush time.
pub trait DocumentDraftSource {
    fn current_title(&self) -> String;
    fn current_content(&self) -> String;
}

/// Debounced autosave for the whiteboard snapshot.
pub struct CanvasSink {
    debounce: DebouncedSink,
}

impl CanvasSink {
    pub fn new(policy: DebouncePolicy) -> Self {
        Self {
            debounce: DebouncedSink::new(policy),
        }
    }

    /// Records one canvas mutation; never blocks, never reads state.
    pub fn notify_changed(&mut self, now: Instant) {
        self.debounce.notify_changed(now);
    }

    /// Whether a pending flush exists.
    pub fn is_pending(&self) -> bool {
        self.debounce.is_pending()
    }

    /// Flushes when the quiet period has elapsed since the last mutation.
    pub fn flush_due<R: CanvasRepository>(
        &mut self,
        now: Instant,
        source: &impl CanvasSnapshotSource,
        service: &mut CanvasService<R>,
    ) -> FlushOutcome {
        if !self.debounce.take_due(now) {
            return FlushOutcome::NotDue;
        }
        write_canvas(source, service)
    }

    /// Flushes immediately, cancelling any pending deadline.
    ///
    /// Used when leaving the canvas surface so the debounce window is not a
    /// durability hole across navigation.
    pub fn flush_now<R: CanvasRepository>(
        &mut self,
        source: &impl CanvasSnapshotSource,
        service: &mut CanvasService<R>,
    ) -> FlushOutcome {
        self.debounce.cancel();
        write_canvas(source, service)
    }
}

fn write_canvas<R: CanvasRepository>(
    source: &impl CanvasSnapshotSource,
    service: &mut CanvasService<R>,
) -> FlushOutcome {
    let snapshot = source.current_snapshot();
    match service.save_canvas(&snapshot) {
        Ok(()) => FlushOutcome::Flushed,
        Err(err) => {
            error!("event=autosave_flush module=autosave status=error surface=canvas error={err}");
            FlushOutcome::Failed
        }
    }
}

/// Debounced autosave for one open document.
///
/// Bound to the document id at construction; a new sink is created when a
/// different document opens.
pub struct DocumentSink {
    target: DocId,
    debounce: DebouncedSink,
}

impl DocumentSink {
    pub fn new(target: DocId, policy: DebouncePolicy) -> Self {
        Self {
            target,
            debounce: DebouncedSink::new(policy),
        }
    }

    /// Document this sink persists.
    pub fn target(&self) -> &DocId {
        &self.target
    }

    /// Records one edit; never blocks, never reads the draft.
    pub fn notify_changed(&mut self, now: Instant) {
        self.debounce.notify_changed(now);
    }

    /// Whether a pending flush exists.
    pub fn is_pending(&self) -> bool {
        self.debounce.is_pending()
    }

    /// Flushes when the quiet period has elapsed since the last edit.
    pub fn flush_due<R: DocumentRepository>(
        &mut self,
        now: Instant,
        source: &impl DocumentDraftSource,
        service: &mut DocumentService<R>,
    ) -> FlushOutcome {
        if !self.debounce.take_due(now) {
            return FlushOutcome::NotDue;
        }
        self.write_document(source, service)
    }

    /// Flushes immediately, cancelling any pending deadline.
    ///
    /// Used when the editor closes so the last keystrokes of a session are
    /// not lost to the debounce window.
    pub fn flush_now<R: DocumentRepository>(
        &mut self,
        source: &impl DocumentDraftSource,
        service: &mut DocumentService<R>,
    ) -> FlushOutcome {
        self.debounce.cancel();
        self.write_document(source, service)
    }

    fn write_document<R: DocumentRepository>(
        &self,
        source: &impl DocumentDraftSource,
        service: &mut DocumentService<R>,
    ) -> FlushOutcome {
        let title = source.current_title();
        let content = source.current_content();
        match service.save_document(&self.target, &title, &content) {
            Ok(_) => FlushOutcome::Flushed,
            Err(DocumentServiceError::InvalidTitle(details)) => {
                error!(
                    "event=autosave_flush module=autosave status=error surface=document doc_id={} error_code=invalid_title error={details}",
                    self.target
                );
                FlushOutcome::Failed
            }
            Err(err) => {
                error!(
                    "event=autosave_flush module=autosave status=error surface=document doc_id={} error={err}",
                    self.target
                );
                FlushOutcome::Failed
            }
        }
    }
}
