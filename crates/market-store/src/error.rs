//! Storage error types.

use thiserror::Error;

/// Errors that can occur when talking to a storage backend.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Failed to open the store.
    #[error("Failed to open store at {path}: {source}")]
    Open {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Filesystem operation failed for a key.
    #[error("I/O error for key {key}: {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },

    /// Backend-specific failure.
    #[error("Store operation failed: {0}")]
    Backend(String),
}
