//! JWT-related error types

use thiserror::Error;

/// Errors that can occur during JWT operations
#[derive(Error, Debug)]
pub enum JwtError {
    /// JWT encoding failed
    #[error("Failed to encode JWT token")]
    EncodingError(#[source] jsonwebtoken::errors::Error),

    /// JWT validation failed
    #[error("Invalid or expired token")]
    ValidationError(#[source] jsonwebtoken::errors::Error),
}
