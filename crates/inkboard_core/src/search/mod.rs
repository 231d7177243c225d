//! Document search entry points.
//!
//! # Responsibility
//! - Expose query APIs over persisted document titles and previews.
//! - Keep search result shaping inside core.

pub mod query;

pub use query::{
    normalize_search_limit, search_documents, SearchHit, SearchQuery, SearchResponse,
};
