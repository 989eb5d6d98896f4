//! Error types for testimonial operations

use portfolio_storage::RecordStoreError;
use thiserror::Error;

/// Result type for testimonial operations
pub type TestimonialResult<T> = Result<T, TestimonialError>;

/// Errors that can occur while managing testimonials
#[derive(Debug, Error)]
pub enum TestimonialError {
    /// The submitted testimonial breaks a field rule
    #[error("Invalid testimonial: {0}")]
    Validation(String),

    /// No testimonial with this id exists
    #[error("Testimonial not found: {0}")]
    NotFound(String),

    /// The record store could not be read or written
    #[error(transparent)]
    Store(#[from] RecordStoreError),
}
