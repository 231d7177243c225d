//! Opaque whiteboard snapshot model.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Complete serialized state of the whiteboard, as produced by the host
/// canvas engine's snapshot call.
///
/// Core treats the payload as opaque; it is persisted and restored whole.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CanvasSnapshot(Value);

impl CanvasSnapshot {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    /// First-run snapshot: an empty board.
    pub fn empty() -> Self {
        Self(Value::Object(serde_json::Map::new()))
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    pub fn into_value(self) -> Value {
        self.0
    }

    /// Whether this snapshot carries no board state at all.
    pub fn is_empty(&self) -> bool {
        match &self.0 {
            Value::Null => true,
            Value::Object(map) => map.is_empty(),
            _ => false,
        }
    }
}

impl From<Value> for CanvasSnapshot {
    fn from(value: Value) -> Self {
        Self(value)
    }
}
