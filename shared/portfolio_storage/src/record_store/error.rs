//! Error types for record store operations

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for record store operations
pub type RecordStoreResult<T> = Result<T, RecordStoreError>;

/// Errors that can occur while reading or writing the store document
#[derive(Debug, Error)]
pub enum RecordStoreError {
    /// No document exists yet, the store must be initialized first
    #[error("Record store is not initialized: {0}")]
    NotInitialized(PathBuf),

    /// The stored bytes do not parse as a store document
    #[error("Record store document is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),

    /// Reading or writing the backing file failed
    #[error("Record store I/O error: {0}")]
    Io(#[from] std::io::Error),
}
