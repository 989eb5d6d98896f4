//! Error types for media host operations

use thiserror::Error;

/// Result type for media host operations
pub type MediaResult<T> = Result<T, MediaError>;

/// Errors that can occur while talking to the media host
#[derive(Error, Debug)]
pub enum MediaError {
    /// The media host refused or failed to store the asset
    #[error("Media host rejected the upload: {0}")]
    UploadRejected(String),

    /// The media host failed to delete the asset
    #[error("Media host failed to delete asset: {0}")]
    RemoteDeleteFailed(String),
}
