//! Admin password hashing.
//!
//! New credentials are argon2id PHC strings. Documents written by older
//! deployments may still hold bcrypt hashes (`$2a$`, `$2b$`, `$2y$`); those are
//! verified with bcrypt and never produced.

use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use rand_core::OsRng;
use thiserror::Error;

const BCRYPT_PREFIXES: [&str; 3] = ["$2a$", "$2b$", "$2y$"];

/// Errors raised while hashing or checking a password
#[derive(Debug, Error)]
pub enum PasswordError {
    /// argon2 rejected the input or the stored PHC string
    #[error("argon2: {0}")]
    Argon2(argon2::password_hash::Error),

    /// The stored bcrypt hash is malformed
    #[error("bcrypt: {0}")]
    Bcrypt(#[from] bcrypt::BcryptError),
}

/// Hash a password using argon2id with a random salt.
///
/// # Errors
/// Returns an error if hashing fails
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(PasswordError::Argon2)?;
    Ok(hash.to_string())
}

/// Verify a password against a stored argon2id or legacy bcrypt hash.
///
/// # Errors
/// Returns an error if `hash` is neither a valid PHC string nor a valid bcrypt hash
pub fn verify_password(password: &str, hash: &str) -> Result<bool, PasswordError> {
    if is_bcrypt(hash) {
        return Ok(bcrypt::verify(password, hash)?);
    }

    let parsed_hash = PasswordHash::new(hash).map_err(PasswordError::Argon2)?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

fn is_bcrypt(hash: &str) -> bool {
    BCRYPT_PREFIXES.iter().any(|prefix| hash.starts_with(prefix))
}
