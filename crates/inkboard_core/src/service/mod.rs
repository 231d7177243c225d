//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into use-case level APIs.
//! - Keep UI/FFI layers decoupled from storage details.

pub mod canvas_service;
pub mod document_service;

pub use canvas_service::CanvasService;
pub use document_service::{DocumentService, DocumentServiceError};
