//! Admin token issuance and validation
//!
//! Tokens are compact JWTs signed with HS256 using a shared secret from the
//! environment. The server keeps no session state: a token is valid until its
//! `exp` claim passes, and logging out only discards it client-side.

pub mod error;
mod types;

use chrono::{DateTime, TimeDelta, TimeZone, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};

pub use types::{AdminClaims, IssuedToken, TOKEN_EXPIRATION_SECS};

use error::JwtError;

/// JWT manager backed by a shared HMAC secret
#[derive(Clone)]
pub struct JwtManager {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl JwtManager {
    /// Creates a new JWT manager signing with `secret`
    #[must_use]
    pub fn new(secret: &[u8]) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
        }
    }

    /// Issues a token for `subject` valid from now
    ///
    /// # Errors
    /// Returns `JwtError::EncodingError` if signing fails
    pub fn issue_token(&self, subject: &str) -> Result<IssuedToken, JwtError> {
        self.issue_token_at(subject, Utc::now())
    }

    /// Issues a token for `subject` as if it had been issued at `issued_at`
    ///
    /// # Errors
    /// Returns `JwtError::EncodingError` if signing fails
    pub fn issue_token_at(
        &self,
        subject: &str,
        issued_at: DateTime<Utc>,
    ) -> Result<IssuedToken, JwtError> {
        let claims = AdminClaims::new(subject, issued_at);
        let header = Header::new(Algorithm::HS256);
        let token = jsonwebtoken::encode(&header, &claims, &self.encoding_key)
            .map_err(JwtError::EncodingError)?;

        Ok(IssuedToken {
            token,
            expires_at: Utc
                .timestamp_opt(claims.exp, 0)
                .single()
                .unwrap_or(issued_at + TimeDelta::seconds(TOKEN_EXPIRATION_SECS)),
        })
    }

    /// Validates signature and expiry, returning the claims
    ///
    /// # Errors
    /// Returns `JwtError::ValidationError` if the token is malformed, signed with
    /// another key or expired
    pub fn validate(&self, token: &str) -> Result<AdminClaims, JwtError> {
        jsonwebtoken::decode::<AdminClaims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(JwtError::ValidationError)
    }
}
