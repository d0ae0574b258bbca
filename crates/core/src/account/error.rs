//! Account error types.

use thiserror::Error;
use uuid::Uuid;

use crate::auth::PasswordError;
use crate::storage::StorageError;
use crate::upload::UploadError;

/// Account operation errors.
#[derive(Debug, Error)]
pub enum AccountError {
    /// Account not found by id.
    #[error("account not found: {0}")]
    NotFound(Uuid),

    /// Account not found by email.
    #[error("account not found for email: {0}")]
    EmailNotFound(String),

    /// Email already registered to another account.
    #[error("email already registered: {0}")]
    AlreadyExists(String),

    /// Missing or malformed input.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Credential check failed. Deliberately does not say whether the
    /// account was missing or the password wrong.
    #[error("invalid credentials")]
    Unauthenticated,

    /// Object store failure.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// Persistence failure.
    #[error("repository error: {0}")]
    Repository(String),

    /// Password hashing/verification failure (not a mismatch).
    #[error("password error: {0}")]
    Password(#[from] PasswordError),

    /// The record was deleted but its photo could not be removed. State is
    /// knowingly inconsistent and flagged for manual reconciliation.
    #[error("record {id} deleted but photo '{key}' could not be removed")]
    PhotoCleanupFailed {
        /// Identifier of the deleted account.
        id: Uuid,
        /// Storage key of the orphaned blob.
        key: String,
    },

    /// Chunked request assembly failure.
    #[error("upload error: {0}")]
    Upload(#[from] UploadError),
}

impl AccountError {
    /// Create an invalid input error.
    #[must_use]
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Create a repository error.
    #[must_use]
    pub fn repository(msg: impl Into<String>) -> Self {
        Self::Repository(msg.into())
    }
}
