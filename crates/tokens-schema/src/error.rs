//! Error types for tokens-schema

/// Result type for tokens-schema operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while reading token documents and manifests
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A token document is not a JSON object
    #[error("Invalid token document {name}: {message}")]
    InvalidDocument { name: String, message: String },

    /// A manifest does not have the expected shape
    #[error("Invalid manifest: {message}")]
    InvalidManifest { message: String },

    /// A color value could not be parsed
    #[error("Invalid color: {value}")]
    InvalidColor { value: String },

    /// JSON serialization/deserialization error
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
