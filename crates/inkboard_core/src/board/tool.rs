//! Canvas tool contracts and the in-process tool table.
//!
//! # Responsibility
//! - Define the capability interface concrete tools implement.
//! - Register and select tools by stable id at runtime.
//!
//! # Invariants
//! - Tool ids are lowercase `[a-z0-9_-]`, unique within a registry.
//! - Selecting an unknown id is a semantic error, never a panic.
//!
//! Tools are registered against an interface instead of subclassing a
//! host-provided base class, so the set of tools is data the host queries,
//! and each tool is testable without a canvas.

use super::button_shape::ButtonShape;
use crate::gesture::Point;
use crate::model::DocId;
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

/// Id of the host's native selection tool, the default active tool.
pub const SELECT_TOOL_ID: &str = "select";

const TOOL_ID_MAX_CHARS: usize = 64;

/// Pointer cursor a tool asks the host to show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Cursor {
    #[default]
    Default,
    Crosshair,
    Pointer,
}

/// Host-visible effect of entering a tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolEffect {
    None,
    SetCursor(Cursor),
}

/// What a tool wants done after handling a pointer-down.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolAction {
    /// Nothing to do; the host proceeds natively.
    None,
    /// Create a button shape on the board.
    PlaceButton {
        shape: ButtonShape,
        /// Revert to the select tool after placing, so one click places one
        /// button instead of stamping on every subsequent click.
        then_select: bool,
    },
}

/// Capability interface for canvas tools.
pub trait CanvasTool {
    /// Stable registry id.
    fn id(&self) -> &str;

    /// Called when the user switches to this tool.
    fn on_enter(&self) -> ToolEffect {
        ToolEffect::None
    }

    /// Called on pointer-down while this tool is active.
    fn on_pointer_down(&self, point: Point) -> ToolAction;
}

/// Tool registration/selection errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolRegistryError {
    InvalidToolId(String),
    DuplicateToolId(String),
    ToolNotFound(String),
}

impl Display for ToolRegistryError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidToolId(value) => write!(f, "tool id is invalid: `{value}`"),
            Self::DuplicateToolId(value) => write!(f, "tool id already registered: `{value}`"),
            Self::ToolNotFound(value) => write!(f, "tool not found: `{value}`"),
        }
    }
}

impl Error for ToolRegistryError {}

/// Runtime tool table.
#[derive(Default)]
pub struct ToolRegistry {
    tools: BTreeMap<String, Arc<dyn CanvasTool>>,
    active_tool_id: Option<String>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers one tool under its own id.
    pub fn register(&mut self, tool: Arc<dyn CanvasTool>) -> Result<(), ToolRegistryError> {
        let tool_id = tool.id().trim().to_string();
        if !is_valid_tool_id(&tool_id) {
            return Err(ToolRegistryError::InvalidToolId(tool_id));
        }
        if self.tools.contains_key(tool_id.as_str()) {
            return Err(ToolRegistryError::DuplicateToolId(tool_id));
        }

        self.tools.insert(tool_id, tool);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Returns sorted tool ids.
    pub fn tool_ids(&self) -> Vec<String> {
        self.tools.keys().cloned().collect()
    }

    /// Activates one registered tool and returns its entry effect.
    pub fn activate(&mut self, tool_id: &str) -> Result<ToolEffect, ToolRegistryError> {
        let normalized = tool_id.trim();
        let Some(tool) = self.tools.get(normalized) else {
            return Err(ToolRegistryError::ToolNotFound(normalized.to_string()));
        };
        let effect = tool.on_enter();
        self.active_tool_id = Some(normalized.to_string());
        Ok(effect)
    }

    /// Clears the active tool (the host falls back to native select).
    pub fn deactivate(&mut self) {
        self.active_tool_id = None;
    }

    pub fn active_tool_id(&self) -> Option<&str> {
        self.active_tool_id.as_deref()
    }

    /// Routes a pointer-down to the active tool.
    ///
    /// Without an active tool the host handles the event natively and this
    /// returns `ToolAction::None`. When the action asks to revert to select,
    /// the registry deactivates itself before returning.
    pub fn pointer_down(&mut self, point: Point) -> ToolAction {
        let Some(tool) = self
            .active_tool_id
            .as_deref()
            .and_then(|id| self.tools.get(id))
        else {
            return ToolAction::None;
        };

        let action = tool.on_pointer_down(point);
        if matches!(
            action,
            ToolAction::PlaceButton {
                then_select: true,
                ..
            }
        ) {
            self.active_tool_id = None;
        }
        action
    }
}

fn is_valid_tool_id(tool_id: &str) -> bool {
    !tool_id.is_empty()
        && tool_id.chars().count() <= TOOL_ID_MAX_CHARS
        && tool_id
            .chars()
            .all(|ch| ch.is_ascii_lowercase() || ch.is_ascii_digit() || ch == '-' || ch == '_')
}

/// Placement tool for document buttons.
///
/// Shows a crosshair while armed; a single pointer-down places one
/// default-size button centered on the click, bound to a fresh document id,
/// then hands control back to the select tool.
#[derive(Debug, Default)]
pub struct DocButtonTool;

impl DocButtonTool {
    /// Registry id of the placement tool.
    pub const ID: &'static str = "doc-button";
}

impl CanvasTool for DocButtonTool {
    fn id(&self) -> &str {
        Self::ID
    }

    fn on_enter(&self) -> ToolEffect {
        ToolEffect::SetCursor(Cursor::Crosshair)
    }

    fn on_pointer_down(&self, point: Point) -> ToolAction {
        ToolAction::PlaceButton {
            shape: ButtonShape::place_centered(DocId::generate(), point),
            then_select: true,
        }
    }
}
