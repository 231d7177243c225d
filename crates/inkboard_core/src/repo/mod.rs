//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define use-case oriented data access contracts.
//! - Isolate key derivation and store details from service orchestration.
//!
//! # Invariants
//! - Storage keys for a document are derived deterministically from its id;
//!   distinct ids never share a key.
//! - Repository APIs return semantic errors (`NotFound`, `InvalidData`) in
//!   addition to store transport errors.

pub mod canvas_repo;
pub mod doc_repo;

pub use canvas_repo::{CanvasRepository, KvCanvasRepository};
pub use doc_repo::{DocumentRepository, KvDocumentRepository, RepoError, RepoResult};
