//! Admin access guard
//!
//! There is a single admin account. Logging in checks a password against the
//! argon2 hash kept in the store document and hands out a 24 hour token, every
//! admin route then requires that token.
//!
//! ```text
//! Anonymous --login--> Authenticated --expiry / client logout--> Anonymous
//! ```

mod error;
pub mod password;

use std::sync::Arc;

use portfolio_storage::{models::ADMIN_USERNAME, AdminCredential, RecordStore};
use tracing::{info, instrument, warn};

pub use error::AccessError;

use crate::jwt::{IssuedToken, JwtManager};

/// Identity proven by a valid admin token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminIdentity {
    /// Admin username
    pub username: String,
}

/// Issues and verifies admin tokens
#[derive(Clone)]
pub struct AccessGuard {
    jwt_manager: JwtManager,
    record_store: Arc<RecordStore>,
}

impl AccessGuard {
    /// Creates a new access guard
    #[must_use]
    pub const fn new(jwt_manager: JwtManager, record_store: Arc<RecordStore>) -> Self {
        Self {
            jwt_manager,
            record_store,
        }
    }

    /// Checks `password` against the stored credential and issues a token
    ///
    /// # Errors
    ///
    /// - `AccessError::InvalidCredentials` - the password does not match
    /// - `AccessError::Store` - the credential could not be read
    /// - `AccessError::PasswordHash` - the stored hash is unusable
    /// - `AccessError::Signing` - the token could not be signed
    #[instrument(skip_all)]
    pub async fn login(&self, password: &str) -> Result<IssuedToken, AccessError> {
        let AdminCredential {
            username,
            password_hash,
        } = self.record_store.load().await?.admin;

        // Argon2 verification blocks, run it off the async workers
        let password = password.to_owned();
        let matches = tokio::task::spawn_blocking(move || {
            password::verify_password(&password, &password_hash)
        })
        .await
        .map_err(|e| AccessError::PasswordHash(e.to_string()))?
        .map_err(|e| {
            warn!("Stored admin password hash cannot be verified: {e}");
            AccessError::PasswordHash(e.to_string())
        })?;

        if !matches {
            return Err(AccessError::InvalidCredentials);
        }

        let issued = self
            .jwt_manager
            .issue_token(&username)
            .map_err(AccessError::Signing)?;

        info!(%username, "Admin logged in");
        Ok(issued)
    }

    /// Verifies a bearer token
    ///
    /// # Errors
    ///
    /// Returns `AccessError::InvalidToken` if the token is malformed, forged,
    /// expired or was not issued to the admin
    pub fn verify(&self, token: &str) -> Result<AdminIdentity, AccessError> {
        let claims = self
            .jwt_manager
            .validate(token)
            .map_err(|_| AccessError::InvalidToken)?;

        if claims.sub != ADMIN_USERNAME {
            return Err(AccessError::InvalidToken);
        }

        Ok(AdminIdentity {
            username: claims.sub,
        })
    }
}
