//! Document use-case service.
//!
//! # Responsibility
//! - Provide open/save/rename/list/delete APIs for rich-text documents.
//! - Derive the plain-text preview projection from editor markup.
//! - Keep persistence failures on the load path away from the host UI.
//!
//! # Invariants
//! - `save_document` uses full content replacement semantics.
//! - Opening an unwritten or unreadable document yields the placeholder
//!   record, never an error.
//! - Titles are trimmed; an all-whitespace title is rejected.

use crate::model::{DocId, DocumentRecord};
use crate::repo::{DocumentRepository, RepoError, RepoResult};
use log::warn;
use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};

const PREVIEW_MAX_CHARS: usize = 120;
const TITLE_MAX_CHARS: usize = 256;

static HTML_TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").expect("valid tag regex"));
static HTML_ENTITY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"&(amp|lt|gt|quot|#39|nbsp);").expect("valid entity regex"));
static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid ws regex"));

/// Service error for document use-cases.
#[derive(Debug)]
pub enum DocumentServiceError {
    /// Title input is empty after trimming, or exceeds the length cap.
    InvalidTitle(String),
    /// Target document does not exist.
    DocumentNotFound(DocId),
    /// Persistence-layer failure.
    Repo(RepoError),
}

impl Display for DocumentServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidTitle(details) => write!(f, "invalid document title: {details}"),
            Self::DocumentNotFound(id) => write!(f, "document not found: {id}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for DocumentServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for DocumentServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(id) => Self::DocumentNotFound(id),
            other => Self::Repo(other),
        }
    }
}

/// Document service facade over repository implementations.
pub struct DocumentService<R: DocumentRepository> {
    repo: R,
}

impl<R: DocumentRepository> DocumentService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Opens one document for editing.
    ///
    /// Falls back to the placeholder record when the id was never written
    /// or the stored data is unreadable; the failure is logged but never
    /// surfaced, so the editor always has something to show.
    pub fn open_document(&mut self, id: &DocId) -> DocumentRecord {
        match self.repo.load(id) {
            Ok(Some(record)) => record,
            Ok(None) => DocumentRecord::placeholder(id.clone()),
            Err(err) => {
                warn!(
                    "event=document_open module=service status=fallback doc_id={id} error={err}"
                );
                DocumentRecord::placeholder(id.clone())
            }
        }
    }

    /// Persists title and content for `id`, deriving the preview text.
    pub fn save_document(
        &mut self,
        id: &DocId,
        title: &str,
        content: &str,
    ) -> Result<DocumentRecord, DocumentServiceError> {
        let title = normalize_title(title)?;
        let record = DocumentRecord {
            id: id.clone(),
            title,
            content: content.to_string(),
            preview_text: derive_preview_text(content),
        };
        self.repo.save(&record)?;
        Ok(record)
    }

    /// Renames an existing document.
    ///
    /// # Errors
    /// - `DocumentNotFound` when `id` was never written.
    /// - `InvalidTitle` when the new title is empty or too long.
    pub fn rename_document(&mut self, id: &DocId, title: &str) -> Result<(), DocumentServiceError> {
        let title = normalize_title(title)?;
        if self.repo.load(id)?.is_none() {
            return Err(DocumentServiceError::DocumentNotFound(id.clone()));
        }
        self.repo.save_title(id, &title)?;
        Ok(())
    }

    /// Lists all persisted documents, sorted by id.
    ///
    /// Unreadable records are skipped with a warning instead of failing the
    /// whole listing.
    pub fn list_documents(&mut self) -> RepoResult<Vec<DocumentRecord>> {
        let mut records = Vec::new();
        for id in self.repo.list_ids()? {
            match self.repo.load(&id) {
                Ok(Some(record)) => records.push(record),
                Ok(None) => {}
                Err(err) => warn!(
                    "event=document_list module=service status=skip doc_id={id} error={err}"
                ),
            }
        }
        Ok(records)
    }

    /// Removes every stored field of `id`. Deleting an absent id is a no-op.
    pub fn delete_document(&mut self, id: &DocId) -> RepoResult<()> {
        self.repo.remove(id)
    }
}

fn normalize_title(title: &str) -> Result<String, DocumentServiceError> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(DocumentServiceError::InvalidTitle(
            "title must not be empty".to_string(),
        ));
    }
    let chars = trimmed.chars().count();
    if chars > TITLE_MAX_CHARS {
        return Err(DocumentServiceError::InvalidTitle(format!(
            "title is {chars} characters long; at most {TITLE_MAX_CHARS} are allowed"
        )));
    }
    Ok(trimmed.to_string())
}

/// Derives a plain-text summary from editor markup.
///
/// Tags are dropped, a handful of common entities are decoded, whitespace is
/// collapsed, and the result is capped at a display-friendly length.
pub fn derive_preview_text(content: &str) -> Option<String> {
    let without_tags = HTML_TAG_RE.replace_all(content, " ");
    let decoded = HTML_ENTITY_RE.replace_all(&without_tags, |caps: &regex::Captures<'_>| {
        match caps.get(1).map(|m| m.as_str()) {
            Some("amp") => "&",
            Some("lt") => "<",
            Some("gt") => ">",
            Some("quot") => "\"",
            Some("#39") => "'",
            Some("nbsp") => " ",
            _ => " ",
        }
    });
    let collapsed = WHITESPACE_RE.replace_all(&decoded, " ");
    let trimmed = collapsed.trim();
    if trimmed.is_empty() {
        return None;
    }

    let mut preview: String = trimmed.chars().take(PREVIEW_MAX_CHARS).collect();
    if trimmed.chars().count() > PREVIEW_MAX_CHARS {
        preview.push_str("...");
    }
    Some(preview)
}
