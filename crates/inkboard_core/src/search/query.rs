//! Substring search over persisted documents.
//!
//! # Responsibility
//! - Match queries against titles and derived preview text.
//! - Return typed hits with stable ids and display snippets.
//!
//! # Invariants
//! - A blank query yields zero hits, never an error.
//! - Result ordering is deterministic (document id order).

use crate::model::DocId;
use crate::repo::{DocumentRepository, RepoResult};

/// Limit applied when the caller does not pass one.
pub const SEARCH_DEFAULT_LIMIT: u32 = 10;

/// Hard cap on hits returned by one query.
pub const SEARCH_LIMIT_MAX: u32 = 50;

const SNIPPET_MAX_CHARS: usize = 80;
const SNIPPET_LEAD_CHARS: usize = 20;

/// Search options for one query.
#[derive(Debug, Clone)]
pub struct SearchQuery {
    /// User query text; matched case-insensitively as a substring.
    pub text: String,
    /// Maximum number of hits; normalized into `1..=SEARCH_LIMIT_MAX`.
    pub limit: Option<u32>,
}

impl SearchQuery {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            limit: None,
        }
    }
}

/// Single search hit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchHit {
    pub doc_id: DocId,
    pub title: String,
    /// Short window of the matched field.
    pub snippet: String,
}

/// Result envelope for one query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResponse {
    pub hits: Vec<SearchHit>,
    /// Effective normalized limit the query ran with.
    pub applied_limit: u32,
}

/// Normalizes a caller-provided limit into the supported range.
pub fn normalize_search_limit(limit: Option<u32>) -> u32 {
    limit.unwrap_or(SEARCH_DEFAULT_LIMIT).clamp(1, SEARCH_LIMIT_MAX)
}

/// Searches persisted documents by title and preview text.
///
/// Matching is case-insensitive substring containment; hits come back in
/// document id order, capped at the normalized limit.
pub fn search_documents(
    repo: &mut impl DocumentRepository,
    query: &SearchQuery,
) -> RepoResult<SearchResponse> {
    let applied_limit = normalize_search_limit(query.limit);
    let needle = query.text.trim().to_lowercase();
    if needle.is_empty() {
        return Ok(SearchResponse {
            hits: Vec::new(),
            applied_limit,
        });
    }

    let mut hits = Vec::new();
    for id in repo.list_ids()? {
        if hits.len() as u32 >= applied_limit {
            break;
        }
        let Some(record) = repo.load(&id)? else {
            continue;
        };

        let matched_field = if record.title.to_lowercase().contains(&needle) {
            Some(record.title.clone())
        } else {
            record
                .preview_text
                .as_ref()
                .filter(|preview| preview.to_lowercase().contains(&needle))
                .cloned()
        };

        if let Some(field) = matched_field {
            hits.push(SearchHit {
                snippet: snippet_around(&field, &needle),
                doc_id: record.id,
                title: record.title,
            });
        }
    }

    Ok(SearchResponse {
        hits,
        applied_limit,
    })
}

/// Windows `field` around the first match of `needle`.
///
/// Works on character counts so multi-byte text cannot split a code point;
/// lowercasing is only used to locate the match.
fn snippet_around(field: &str, needle: &str) -> String {
    let chars: Vec<char> = field.chars().collect();
    if chars.len() <= SNIPPET_MAX_CHARS {
        return field.to_string();
    }

    let lowered: Vec<char> = field.to_lowercase().chars().collect();
    let needle_chars: Vec<char> = needle.chars().collect();
    let match_at = lowered
        .windows(needle_chars.len().max(1))
        .position(|window| window == needle_chars.as_slice())
        .unwrap_or(0)
        // Lowercasing can shift char counts for exotic scripts; stay in range.
        .min(chars.len().saturating_sub(1));

    let start = match_at.saturating_sub(SNIPPET_LEAD_CHARS);
    let end = (start + SNIPPET_MAX_CHARS).min(chars.len());
    let mut snippet: String = chars[start..end].iter().collect();
    if start > 0 {
        snippet.insert_str(0, "...");
    }
    if end < chars.len() {
        snippet.push_str("...");
    }
    snippet
}
