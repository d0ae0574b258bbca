//! Account domain types.

use bytes::Bytes;
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// User role tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserRole {
    /// Regular client account.
    Client,
    /// Administrator account.
    Admin,
    /// Coach account.
    Coach,
}

impl UserRole {
    /// Convert to the stored string value.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Client => "client",
            Self::Admin => "admin",
            Self::Coach => "coach",
        }
    }

    /// Parse from a string value.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "client" => Some(Self::Client),
            "admin" => Some(Self::Admin),
            "coach" => Some(Self::Coach),
            _ => None,
        }
    }
}

/// User account record.
///
/// `photo_url` and `photo_key` are empty strings when no photo is stored;
/// the key is kept first-class so no code ever recovers it from the URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    /// Unique identifier, assigned at creation, never reused.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// Email, unique across user accounts.
    pub email: String,
    /// Role tag.
    pub role: UserRole,
    /// Salted password hash. Never exposed outward.
    pub password_hash: String,
    /// Public URL of the stored photo, empty if none.
    pub photo_url: String,
    /// Storage key of the stored photo, empty if none.
    pub photo_key: String,
    /// Creation timestamp, immutable.
    pub created_at: DateTime<Utc>,
    /// Bumped on every mutation.
    pub updated_at: DateTime<Utc>,
}

/// Coach account record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Coach {
    /// Unique identifier, assigned at creation, never reused.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// Free-form description.
    pub description: String,
    /// Public URL of the stored photo, empty if none.
    pub photo_url: String,
    /// Storage key of the stored photo, empty if none.
    pub photo_key: String,
    /// Creation timestamp, immutable.
    pub created_at: DateTime<Utc>,
    /// Bumped on every mutation.
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a user.
#[derive(Debug, Clone)]
pub struct CreateUserInput {
    /// Display name.
    pub name: String,
    /// Email address.
    pub email: String,
    /// Role tag as sent by the caller; validated by the orchestrator.
    pub role: String,
    /// Plaintext password.
    pub password: String,
    /// Optional photo payload.
    pub photo: Option<Bytes>,
}

/// Partial input for updating a user. `None` (or an empty string from the
/// wire) leaves the stored value unchanged.
#[derive(Debug, Clone, Default)]
pub struct UpdateUserInput {
    /// Replacement display name.
    pub name: Option<String>,
    /// Replacement email.
    pub email: Option<String>,
    /// Replacement role tag.
    pub role: Option<String>,
    /// Replacement photo payload.
    pub photo: Option<Bytes>,
}

/// Input for creating a coach.
#[derive(Debug, Clone)]
pub struct CreateCoachInput {
    /// Display name.
    pub name: String,
    /// Free-form description.
    pub description: String,
    /// Optional photo payload.
    pub photo: Option<Bytes>,
}

/// Partial input for updating a coach.
#[derive(Debug, Clone, Default)]
pub struct UpdateCoachInput {
    /// Replacement display name.
    pub name: Option<String>,
    /// Replacement description.
    pub description: Option<String>,
    /// Replacement photo payload.
    pub photo: Option<Bytes>,
}

/// Field patch applied to a persisted user. Only `Some` fields overwrite;
/// `updated_at` is always written.
#[derive(Debug, Clone)]
pub struct UserFieldPatch {
    /// New display name, if provided.
    pub name: Option<String>,
    /// New email, if provided.
    pub email: Option<String>,
    /// New role, if provided.
    pub role: Option<UserRole>,
    /// New photo URL, if the photo was replaced.
    pub photo_url: Option<String>,
    /// New photo key, if the photo was replaced.
    pub photo_key: Option<String>,
    /// Always refreshed.
    pub updated_at: DateTime<Utc>,
}

/// Field patch applied to a persisted coach.
#[derive(Debug, Clone)]
pub struct CoachFieldPatch {
    /// New display name, if provided.
    pub name: Option<String>,
    /// New description, if provided.
    pub description: Option<String>,
    /// New photo URL, if the photo was replaced.
    pub photo_url: Option<String>,
    /// New photo key, if the photo was replaced.
    pub photo_key: Option<String>,
    /// Always refreshed.
    pub updated_at: DateTime<Utc>,
}

/// Normalize a wire-level optional field: an empty string means "not
/// provided", matching the partial-update contract.
pub(crate) fn provided(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.is_empty())
}

/// Storage key for a user's photo, derived from the account id.
#[must_use]
pub fn user_photo_key(id: Uuid) -> String {
    format!("user/{id}")
}

/// Storage key for a coach's photo, derived from the account id.
#[must_use]
pub fn coach_photo_key(id: Uuid) -> String {
    format!("coach/{id}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_roundtrip() {
        for role in [UserRole::Client, UserRole::Admin, UserRole::Coach] {
            assert_eq!(UserRole::parse(role.as_str()), Some(role));
        }
    }

    #[test]
    fn test_role_unknown() {
        assert_eq!(UserRole::parse("manager"), None);
        assert_eq!(UserRole::parse(""), None);
    }

    #[test]
    fn test_photo_keys_are_namespaced() {
        let id = Uuid::new_v4();
        assert_eq!(user_photo_key(id), format!("user/{id}"));
        assert_eq!(coach_photo_key(id), format!("coach/{id}"));
    }
}
