//! Canvas / editor navigation state machine.
//!
//! # Responsibility
//! - Track which surface is on screen and which document it shows.
//! - Give activation owners a typed open-document capability.
//!
//! # Invariants
//! - Exactly one view is active at a time.
//! - The active document id exists only while the editor view is active.
//!
//! Open intent flows through an injected [`OpenDocumentHandler`], not a
//! process-wide broadcast: whoever wires the gesture machine receives the
//! handler from its parent, which keeps the interaction testable and the
//! coupling visible.

use crate::model::DocId;
use log::info;

/// Which surface the host is showing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewState {
    /// The whiteboard canvas.
    Canvas,
    /// The rich-text editor for one document.
    Editor { doc_id: DocId },
}

/// Typed capability for raising an open-document request.
pub trait OpenDocumentHandler {
    fn handle_open(&mut self, id: DocId);
}

/// View state machine for the main window.
#[derive(Debug, Default)]
pub struct Workbench {
    view: Option<DocId>,
}

impl Workbench {
    /// Starts on the canvas view.
    pub fn new() -> Self {
        Self::default()
    }

    /// Switches to the editor for `id`; returns the view that was active.
    ///
    /// Opening while another editor is active replaces it; callers flush the
    /// outgoing document before calling this.
    pub fn open_document(&mut self, id: DocId) -> ViewState {
        let previous = self.active_view();
        info!("event=view_change module=workbench status=ok view=editor doc_id={id}");
        self.view = Some(id);
        previous
    }

    /// Returns to the canvas; yields the document that was open, if any,
    /// so callers can flush it.
    pub fn close_editor(&mut self) -> Option<DocId> {
        let closed = self.view.take();
        if let Some(id) = &closed {
            info!("event=view_change module=workbench status=ok view=canvas closed_doc_id={id}");
        }
        closed
    }

    pub fn active_view(&self) -> ViewState {
        match &self.view {
            Some(doc_id) => ViewState::Editor {
                doc_id: doc_id.clone(),
            },
            None => ViewState::Canvas,
        }
    }

    /// Document shown by the editor view, when active.
    pub fn active_document(&self) -> Option<&DocId> {
        self.view.as_ref()
    }
}

impl OpenDocumentHandler for Workbench {
    fn handle_open(&mut self, id: DocId) {
        self.open_document(id);
    }
}
