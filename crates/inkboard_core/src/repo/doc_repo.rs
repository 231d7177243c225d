//! Document repository contracts and key-value implementation.
//!
//! # Responsibility
//! - Provide stable load/save APIs over per-document storage keys.
//! - Keep key derivation inside the core persistence boundary.
//!
//! # Invariants
//! - Keys are `doc.<id>.<field>`: the fixed suffix pins the field and the id
//!   occupies the whole middle segment, so distinct ids cannot alias.
//! - A document exists when its content key exists; title/preview alone do
//!   not make a document visible to listing.
//! - Read paths reject non-string values under document keys instead of
//!   masking them.

use crate::model::{DocId, DocIdError, DocumentRecord};
use crate::store::{KvStore, StoreError};
use serde_json::Value;
use std::error::Error;
use std::fmt::{Display, Formatter};

const DOC_KEY_PREFIX: &str = "doc.";
const CONTENT_SUFFIX: &str = ".content";
const TITLE_SUFFIX: &str = ".title";
const PREVIEW_SUFFIX: &str = ".preview";

pub type RepoResult<T> = Result<T, RepoError>;

/// Generic repository error for document and canvas persistence.
#[derive(Debug)]
pub enum RepoError {
    Store(StoreError),
    InvalidId(DocIdError),
    NotFound(DocId),
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Store(err) => write!(f, "{err}"),
            Self::InvalidId(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "document not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted document data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Store(err) => Some(err),
            Self::InvalidId(err) => Some(err),
            Self::NotFound(_) => None,
            Self::InvalidData(_) => None,
        }
    }
}

impl From<StoreError> for RepoError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

impl From<DocIdError> for RepoError {
    fn from(value: DocIdError) -> Self {
        Self::InvalidId(value)
    }
}

/// Storage key holding a document's serialized rich-text content.
pub fn content_key(id: &DocId) -> String {
    format!("{DOC_KEY_PREFIX}{id}{CONTENT_SUFFIX}")
}

/// Storage key holding a document's title.
pub fn title_key(id: &DocId) -> String {
    format!("{DOC_KEY_PREFIX}{id}{TITLE_SUFFIX}")
}

/// Storage key holding a document's derived preview text.
pub fn preview_key(id: &DocId) -> String {
    format!("{DOC_KEY_PREFIX}{id}{PREVIEW_SUFFIX}")
}

/// Repository interface for document persistence.
pub trait DocumentRepository {
    /// Loads a full record; `None` means the id was never written.
    fn load(&mut self, id: &DocId) -> RepoResult<Option<DocumentRecord>>;
    /// Persists all fields of `record` durably.
    fn save(&mut self, record: &DocumentRecord) -> RepoResult<()>;
    /// Persists only the content field.
    fn save_content(&mut self, id: &DocId, content: &str) -> RepoResult<()>;
    /// Persists only the title field.
    fn save_title(&mut self, id: &DocId, title: &str) -> RepoResult<()>;
    /// Removes every key belonging to `id`. Removing an absent id is a no-op.
    fn remove(&mut self, id: &DocId) -> RepoResult<()>;
    /// Ids of all persisted documents, sorted for deterministic listings.
    fn list_ids(&mut self) -> RepoResult<Vec<DocId>>;
}

/// Key-value-store-backed document repository.
pub struct KvDocumentRepository<'s> {
    store: &'s mut KvStore,
}

impl<'s> KvDocumentRepository<'s> {
    pub fn new(store: &'s mut KvStore) -> Self {
        Self { store }
    }

    fn read_string(&self, key: &str) -> RepoResult<Option<String>> {
        match self.store.get(key) {
            None => Ok(None),
            Some(Value::String(text)) => Ok(Some(text.clone())),
            Some(other) => Err(RepoError::InvalidData(format!(
                "key `{key}` holds a non-string value: {other}"
            ))),
        }
    }
}

impl DocumentRepository for KvDocumentRepository<'_> {
    fn load(&mut self, id: &DocId) -> RepoResult<Option<DocumentRecord>> {
        let Some(content) = self.read_string(&content_key(id))? else {
            return Ok(None);
        };

        let title = self
            .read_string(&title_key(id))?
            .unwrap_or_else(|| crate::model::document::DEFAULT_DOCUMENT_TITLE.to_string());
        let preview_text = self.read_string(&preview_key(id))?;

        Ok(Some(DocumentRecord {
            id: id.clone(),
            title,
            content,
            preview_text,
        }))
    }

    fn save(&mut self, record: &DocumentRecord) -> RepoResult<()> {
        self.store
            .set(content_key(&record.id), Value::from(record.content.clone()));
        self.store
            .set(title_key(&record.id), Value::from(record.title.clone()));
        match &record.preview_text {
            Some(preview) => self
                .store
                .set(preview_key(&record.id), Value::from(preview.clone())),
            None => {
                self.store.remove(&preview_key(&record.id));
            }
        }
        self.store.save()?;
        Ok(())
    }

    fn save_content(&mut self, id: &DocId, content: &str) -> RepoResult<()> {
        self.store.set(content_key(id), Value::from(content));
        self.store.save()?;
        Ok(())
    }

    fn save_title(&mut self, id: &DocId, title: &str) -> RepoResult<()> {
        self.store.set(title_key(id), Value::from(title));
        self.store.save()?;
        Ok(())
    }

    fn remove(&mut self, id: &DocId) -> RepoResult<()> {
        let removed_content = self.store.remove(&content_key(id)).is_some();
        let removed_title = self.store.remove(&title_key(id)).is_some();
        let removed_preview = self.store.remove(&preview_key(id)).is_some();
        if removed_content || removed_title || removed_preview {
            self.store.save()?;
        }
        Ok(())
    }

    fn list_ids(&mut self) -> RepoResult<Vec<DocId>> {
        let mut ids = Vec::new();
        for key in self.store.keys_with_prefix(DOC_KEY_PREFIX) {
            let Some(middle) = key
                .strip_prefix(DOC_KEY_PREFIX)
                .and_then(|rest| rest.strip_suffix(CONTENT_SUFFIX))
            else {
                continue;
            };
            let id = DocId::parse(middle).map_err(|err| {
                RepoError::InvalidData(format!("key `{key}` holds an unusable document id: {err}"))
            })?;
            ids.push(id);
        }
        ids.sort();
        Ok(ids)
    }
}
