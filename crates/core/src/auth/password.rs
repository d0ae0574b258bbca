//! Password hashing with Argon2id.
//!
//! Produces PHC-format strings with a fresh random salt per hash.

use argon2::{
    Argon2, PasswordHash,
    password_hash::{PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use thiserror::Error;

/// Errors that can occur during password operations.
#[derive(Debug, Error)]
pub enum PasswordError {
    /// Hashing failed (RNG or algorithm failure, effectively fatal).
    #[error("failed to hash password: {0}")]
    Hash(String),

    /// Stored hash is not a valid PHC string.
    #[error("invalid password hash format")]
    InvalidHash,

    /// Verification failed for a reason other than a mismatch.
    #[error("failed to verify password: {0}")]
    Verify(String),
}

/// Hashes a plaintext password using Argon2id.
///
/// # Errors
///
/// Returns `PasswordError::Hash` if hashing fails. This is an internal
/// failure, not a property of the input.
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| PasswordError::Hash(e.to_string()))
}

/// Verifies a plaintext password against a stored hash.
///
/// Returns `Ok(false)` on a mismatch. The plaintext is never logged and
/// never appears in any error value.
///
/// # Errors
///
/// Returns `PasswordError::InvalidHash` if the stored hash cannot be parsed,
/// `PasswordError::Verify` on unexpected verifier failures.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, PasswordError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| PasswordError::InvalidHash)?;

    match Argon2::default().verify_password(password.as_bytes(), &parsed_hash) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(PasswordError::Verify(e.to_string())),
    }
}
