use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Token lifetime in seconds (24 hours)
pub const TOKEN_EXPIRATION_SECS: i64 = 24 * 60 * 60;

/// Claims carried by an admin token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminClaims {
    /// Admin username
    pub sub: String,
    /// Issued at, Unix seconds
    pub iat: i64,
    /// Expires at, Unix seconds
    pub exp: i64,
}

impl AdminClaims {
    #[must_use]
    pub fn new(subject: &str, issued_at: DateTime<Utc>) -> Self {
        Self {
            sub: subject.to_string(),
            iat: issued_at.timestamp(),
            exp: issued_at.timestamp() + TOKEN_EXPIRATION_SECS,
        }
    }
}

/// Signed token handed to the client
#[derive(Debug, Clone)]
pub struct IssuedToken {
    /// Compact JWT
    pub token: String,
    /// Expiration time
    pub expires_at: DateTime<Utc>,
}
