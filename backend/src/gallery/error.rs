//! Error types for gallery operations

use portfolio_storage::RecordStoreError;
use thiserror::Error;

use crate::media_storage::MediaError;

/// Result type for gallery operations
pub type GalleryResult<T> = Result<T, GalleryError>;

/// Errors that can occur while managing gallery images
#[derive(Debug, Error)]
pub enum GalleryError {
    /// The upload or its fields are not acceptable
    #[error("Invalid upload: {0}")]
    Validation(String),

    /// No image with this id exists
    #[error("Image not found: {0}")]
    NotFound(String),

    /// The media host refused the asset
    #[error(transparent)]
    Upload(#[from] MediaError),

    /// The upload could not be spooled to a temporary file
    #[error("Failed to stage upload: {0}")]
    Staging(#[source] std::io::Error),

    /// The record store could not be read or written
    #[error(transparent)]
    Store(#[from] RecordStoreError),
}
