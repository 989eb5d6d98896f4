//! Error types for admin access

use portfolio_storage::RecordStoreError;
use thiserror::Error;

use crate::jwt::error::JwtError;

/// Errors that can occur while logging in or checking a token
#[derive(Debug, Error)]
pub enum AccessError {
    /// No bearer token was presented
    #[error("Missing bearer token")]
    MissingToken,

    /// The token is malformed, forged, expired or not an admin token
    #[error("Invalid or expired token")]
    InvalidToken,

    /// The password does not match the stored credential
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Issuing the token failed
    #[error("Failed to issue token: {0}")]
    Signing(#[source] JwtError),

    /// The stored hash could not be used or the hashing task failed
    #[error("Password hashing error: {0}")]
    PasswordHash(String),

    /// The credential could not be read
    #[error(transparent)]
    Store(#[from] RecordStoreError),
}
