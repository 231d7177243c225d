//! Document button shape geometry rules.
//!
//! # Responsibility
//! - Define the persisted shape record binding a board position to a doc id.
//! - Enforce the sizing rules the host resize handles must respect.
//!
//! # Invariants
//! - Neither axis shrinks below `BUTTON_MIN_SIZE`.
//! - The aspect ratio is locked; hosts scale both axes together.

use crate::gesture::Point;
use crate::model::DocId;
use serde::{Deserialize, Serialize};

/// Edge length of a freshly placed button, in board units.
pub const BUTTON_DEFAULT_SIZE: f64 = 64.0;

/// Smallest edge length a resize may produce.
pub const BUTTON_MIN_SIZE: f64 = 32.0;

/// One document button on the whiteboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ButtonShape {
    /// Document opened when the button is activated.
    pub doc_id: DocId,
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl ButtonShape {
    /// Creates a default-size button with its top-left corner at (x, y).
    pub fn new(doc_id: DocId, x: f64, y: f64) -> Self {
        Self {
            doc_id,
            x,
            y,
            w: BUTTON_DEFAULT_SIZE,
            h: BUTTON_DEFAULT_SIZE,
        }
    }

    /// Creates a default-size button centered on `point`.
    ///
    /// Placement tools pass the pointer position; centering keeps the new
    /// button under the cursor instead of hanging off its corner.
    pub fn place_centered(doc_id: DocId, point: Point) -> Self {
        Self::new(
            doc_id,
            point.x - BUTTON_DEFAULT_SIZE / 2.0,
            point.y - BUTTON_DEFAULT_SIZE / 2.0,
        )
    }

    /// Applies a host resize, scaling from this shape's current extent.
    ///
    /// Each axis is clamped at `BUTTON_MIN_SIZE`; position is the host's
    /// business and is left unchanged.
    pub fn resized(&self, scale_x: f64, scale_y: f64) -> Self {
        Self {
            doc_id: self.doc_id.clone(),
            x: self.x,
            y: self.y,
            w: (self.w * scale_x).max(BUTTON_MIN_SIZE),
            h: (self.h * scale_y).max(BUTTON_MIN_SIZE),
        }
    }

    /// The button keeps its aspect ratio under host resize handles.
    pub fn aspect_ratio_locked(&self) -> bool {
        true
    }
}
