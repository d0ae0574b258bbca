//! Credential handling.
//!
//! One-shot password hashing and verification. No sessions, no tokens.

mod password;

pub use password::{PasswordError, hash_password, verify_password};
