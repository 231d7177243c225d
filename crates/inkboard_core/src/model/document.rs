//! Document identity and record model.
//!
//! # Responsibility
//! - Define the opaque document id scoping title/content in storage.
//! - Provide the placeholder record shown before a document is first saved.
//!
//! # Invariants
//! - A `DocId` is stable and never reused for another document.
//! - Two distinct ids never alias the same storage slot (see `repo::keys`).

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

const DOC_ID_MAX_CHARS: usize = 128;

/// Title used for documents that were never renamed.
pub const DEFAULT_DOCUMENT_TITLE: &str = "Untitled document";

/// Editor markup shown the first time a document opens.
pub const DEFAULT_DOCUMENT_CONTENT: &str = "<h2>Hello!</h2><p>Start writing...</p>";

/// Opaque stable identifier for one rich-text document.
///
/// Generated ids are uuid-v4 strings; externally supplied ids are accepted
/// as-is after validation so hosts can bring their own identity scheme.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocId(String);

impl DocId {
    /// Generates a fresh globally unique document id.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Validates and wraps an externally supplied id.
    ///
    /// # Errors
    /// - Empty (after trimming) ids are rejected.
    /// - Ids longer than 128 characters are rejected.
    /// - Control characters are rejected; everything else is opaque.
    pub fn parse(value: &str) -> Result<Self, DocIdError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(DocIdError::Empty);
        }
        let chars = trimmed.chars().count();
        if chars > DOC_ID_MAX_CHARS {
            return Err(DocIdError::TooLong(chars));
        }
        if let Some(found) = trimmed.chars().find(|ch| ch.is_control()) {
            return Err(DocIdError::ControlCharacter(found));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for DocId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Document id validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocIdError {
    Empty,
    TooLong(usize),
    ControlCharacter(char),
}

impl Display for DocIdError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => write!(f, "document id must not be empty"),
            Self::TooLong(chars) => write!(
                f,
                "document id is {chars} characters long; at most {DOC_ID_MAX_CHARS} are allowed"
            ),
            Self::ControlCharacter(found) => {
                write!(f, "document id contains control character {found:?}")
            }
        }
    }
}

impl Error for DocIdError {}

/// Canonical persisted shape of one rich-text document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentRecord {
    /// Stable id scoping the storage keys for this document.
    pub id: DocId,
    /// User-visible title.
    pub title: String,
    /// Opaque serialized rich-text markup produced by the editor host.
    pub content: String,
    /// Plain-text summary derived from `content` at save time.
    pub preview_text: Option<String>,
}

impl DocumentRecord {
    /// Creates a record with explicit fields and no derived preview.
    pub fn new(id: DocId, title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            content: content.into(),
            preview_text: None,
        }
    }

    /// Record served for an id that was never written (or is unreadable).
    ///
    /// Graceful degradation: missing prior data becomes the placeholder
    /// document instead of an error surfaced to the host.
    pub fn placeholder(id: DocId) -> Self {
        Self::new(id, DEFAULT_DOCUMENT_TITLE, DEFAULT_DOCUMENT_CONTENT)
    }
}
