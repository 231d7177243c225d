//! JSON-backed key-value storage bootstrap and format migration entry points.
//!
//! # Responsibility
//! - Open and persist the flat key-value store file used by Inkboard.
//! - Apply store format migrations in deterministic order.
//!
//! # Invariants
//! - Format version is tracked under the reserved `store.format_version` key.
//! - Core code must not read/write application data before migrations succeed.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod migrations;
mod json_store;

pub use json_store::{KvStore, FORMAT_VERSION_KEY};

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug)]
pub enum StoreError {
    Io(std::io::Error),
    Corrupt(String),
    UnsupportedFormatVersion {
        file_version: u32,
        latest_supported: u32,
    },
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "{err}"),
            Self::Corrupt(details) => write!(f, "store file is not a valid key-value document: {details}"),
            Self::UnsupportedFormatVersion {
                file_version,
                latest_supported,
            } => write!(
                f,
                "store format version {file_version} is newer than supported {latest_supported}"
            ),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Corrupt(_) => None,
            Self::UnsupportedFormatVersion { .. } => None,
        }
    }
}

impl From<std::io::Error> for StoreError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}
