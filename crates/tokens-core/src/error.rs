//! Error types for tokens-core
//!
//! Per-item import failures never surface here; they are reported as
//! [`OperationResult`](crate::OperationResult)s. These errors cover loading
//! sources and persisting stores.

use std::path::PathBuf;

use crate::store::StoreError;

/// Result type for tokens-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while preparing or persisting an import
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A source file could not be read
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Two inputs resolve to the same document name
    #[error("Duplicate document name: {name}")]
    DuplicateDocument { name: String },

    /// More than one input looks like a manifest
    #[error("More than one manifest supplied: {first} and {second}")]
    MultipleManifests { first: String, second: String },

    /// Variable store error
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Document or manifest error from tokens-schema
    #[error(transparent)]
    Schema(#[from] tokens_schema::Error),

    /// JSON serialization/deserialization error
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
