//! Repository contracts for account persistence.
//!
//! Implemented by the db crate. Single-entity lookups return `Option`;
//! batch and list lookups return an empty collection when nothing matches.

use uuid::Uuid;

use super::error::AccountError;
use super::types::{Coach, CoachFieldPatch, User, UserFieldPatch, UserRole};

/// Durable storage of user records.
pub trait UserRepository: Send + Sync {
    /// Persist a fully formed user record.
    fn create(
        &self,
        user: User,
    ) -> impl std::future::Future<Output = Result<User, AccountError>> + Send;

    /// Look up a user by id.
    fn get_by_id(
        &self,
        id: Uuid,
    ) -> impl std::future::Future<Output = Result<Option<User>, AccountError>> + Send;

    /// Look up a user by email.
    fn get_by_email(
        &self,
        email: &str,
    ) -> impl std::future::Future<Output = Result<Option<User>, AccountError>> + Send;

    /// Apply a partial field update. Only `Some` fields overwrite stored
    /// values; `updated_at` is always written.
    fn update_fields(
        &self,
        id: Uuid,
        patch: UserFieldPatch,
    ) -> impl std::future::Future<Output = Result<(), AccountError>> + Send;

    /// Delete a user record.
    fn delete(
        &self,
        id: Uuid,
    ) -> impl std::future::Future<Output = Result<(), AccountError>> + Send;

    /// Fetch a batch of users. Unknown ids are silently omitted.
    fn get_many(
        &self,
        ids: &[Uuid],
    ) -> impl std::future::Future<Output = Result<Vec<User>, AccountError>> + Send;

    /// List users with the given role.
    fn get_by_role(
        &self,
        role: UserRole,
    ) -> impl std::future::Future<Output = Result<Vec<User>, AccountError>> + Send;
}

/// Durable storage of coach records.
pub trait CoachRepository: Send + Sync {
    /// Persist a fully formed coach record.
    fn create(
        &self,
        coach: Coach,
    ) -> impl std::future::Future<Output = Result<Coach, AccountError>> + Send;

    /// Look up a coach by id.
    fn get_by_id(
        &self,
        id: Uuid,
    ) -> impl std::future::Future<Output = Result<Option<Coach>, AccountError>> + Send;

    /// Apply a partial field update.
    fn update_fields(
        &self,
        id: Uuid,
        patch: CoachFieldPatch,
    ) -> impl std::future::Future<Output = Result<(), AccountError>> + Send;

    /// Delete a coach record.
    fn delete(
        &self,
        id: Uuid,
    ) -> impl std::future::Future<Output = Result<(), AccountError>> + Send;

    /// List all coaches.
    fn get_all(&self)
    -> impl std::future::Future<Output = Result<Vec<Coach>, AccountError>> + Send;
}
