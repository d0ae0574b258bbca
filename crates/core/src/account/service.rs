//! User orchestration service.

use std::sync::Arc;

use chrono::Utc;
use tracing::warn;
use uuid::Uuid;

use crate::auth::{hash_password, verify_password};
use crate::storage::ObjectStorage;

use super::error::AccountError;
use super::photos::{PhotoReplacement, discard_uploaded_blob, rollback_replacement};
use super::repository::UserRepository;
use super::types::{
    CreateUserInput, UpdateUserInput, User, UserFieldPatch, UserRole, provided, user_photo_key,
};

/// Orchestrates user create/update/delete across the repository and the
/// object store. Stateless between calls; safe to share across requests.
pub struct UserService<R, S> {
    repo: Arc<R>,
    store: Arc<S>,
}

impl<R: UserRepository, S: ObjectStorage> UserService<R, S> {
    /// Create a new user service.
    #[must_use]
    pub fn new(repo: Arc<R>, store: Arc<S>) -> Self {
        Self { repo, store }
    }

    /// Create a user, uploading the photo first so a storage failure aborts
    /// before anything is persisted.
    ///
    /// Either both the record and its photo exist afterwards, or neither
    /// does. If the persistence step fails after the photo was uploaded,
    /// the blob is deleted best-effort; a cleanup failure is logged loudly
    /// and never masks the persistence error.
    ///
    /// # Errors
    ///
    /// `InvalidInput` on missing fields or an unknown role, `AlreadyExists`
    /// on a taken email, `Storage`/`Repository`/`Password` on adapter
    /// failures.
    pub async fn create(&self, input: CreateUserInput) -> Result<User, AccountError> {
        if input.name.is_empty() {
            return Err(AccountError::invalid_input("name is required"));
        }
        if input.email.is_empty() {
            return Err(AccountError::invalid_input("email is required"));
        }
        if input.password.is_empty() {
            return Err(AccountError::invalid_input("password is required"));
        }
        let role = UserRole::parse(&input.role)
            .ok_or_else(|| AccountError::invalid_input(format!("unknown role '{}'", input.role)))?;

        if self.repo.get_by_email(&input.email).await?.is_some() {
            return Err(AccountError::AlreadyExists(input.email));
        }

        let id = Uuid::new_v4();

        let mut photo_url = String::new();
        let mut photo_key = String::new();
        let mut uploaded = false;
        if let Some(bytes) = input.photo {
            let key = user_photo_key(id);
            photo_url = self.store.put(bytes, &key).await?;
            photo_key = key;
            uploaded = true;
        }

        let password_hash = match hash_password(&input.password) {
            Ok(hash) => hash,
            Err(e) => {
                if uploaded {
                    discard_uploaded_blob(self.store.as_ref(), id, &photo_key).await;
                }
                return Err(e.into());
            }
        };

        let now = Utc::now();
        let record = User {
            id,
            name: input.name,
            email: input.email,
            role,
            password_hash,
            photo_url,
            photo_key: photo_key.clone(),
            created_at: now,
            updated_at: now,
        };

        match self.repo.create(record).await {
            Ok(user) => Ok(user),
            Err(e) => {
                if uploaded {
                    discard_uploaded_blob(self.store.as_ref(), id, &photo_key).await;
                }
                Err(e)
            }
        }
    }

    /// Apply a partial update, replacing the photo if new bytes arrived.
    ///
    /// The photo is overwritten under the key derived from the account id;
    /// previous bytes are captured first so a failed persistence step can
    /// restore them. A failed metadata update never leaves the stored photo
    /// silently pointing at bytes the record does not reference.
    ///
    /// # Errors
    ///
    /// `NotFound` if the account is absent, `AlreadyExists` if the new
    /// email belongs to another account, plus adapter failures.
    pub async fn update(&self, id: Uuid, input: UpdateUserInput) -> Result<User, AccountError> {
        let name = provided(input.name);
        let email = provided(input.email);
        let role = match provided(input.role) {
            Some(r) => Some(
                UserRole::parse(&r)
                    .ok_or_else(|| AccountError::invalid_input(format!("unknown role '{r}'")))?,
            ),
            None => None,
        };

        let current = self
            .repo
            .get_by_id(id)
            .await?
            .ok_or(AccountError::NotFound(id))?;

        if let Some(new_email) = &email {
            if let Some(other) = self.repo.get_by_email(new_email).await? {
                if other.id != id {
                    return Err(AccountError::AlreadyExists(new_email.clone()));
                }
            }
        }

        let mut replacement: Option<PhotoReplacement> = None;
        let mut photo_url = None;
        let mut photo_key = None;
        if let Some(bytes) = input.photo {
            let key = user_photo_key(id);
            let previous = if current.photo_key == key && self.store.exists(&key).await? {
                Some(self.store.get(&key).await?)
            } else {
                None
            };
            photo_url = Some(self.store.put(bytes, &key).await?);
            photo_key = Some(key.clone());
            replacement = Some(PhotoReplacement { key, previous });
        }

        let patch = UserFieldPatch {
            name,
            email,
            role,
            photo_url,
            photo_key,
            updated_at: Utc::now(),
        };

        if let Err(e) = self.repo.update_fields(id, patch).await {
            if let Some(replacement) = replacement {
                rollback_replacement(self.store.as_ref(), id, replacement).await;
            }
            return Err(e);
        }

        // A stored key from an older layout now points at a superseded blob.
        if replacement.is_some()
            && !current.photo_key.is_empty()
            && current.photo_key != user_photo_key(id)
        {
            if let Err(e) = self.store.delete(&current.photo_key).await {
                warn!(
                    user_id = %id,
                    key = %current.photo_key,
                    error = %e,
                    "failed to delete superseded photo"
                );
            }
        }

        self.repo
            .get_by_id(id)
            .await?
            .ok_or(AccountError::NotFound(id))
    }

    /// Delete a user and its stored photo.
    ///
    /// The record deletion is authoritative: if the blob cannot be removed
    /// afterwards, the error is `PhotoCleanupFailed` and the record stays
    /// deleted.
    ///
    /// # Errors
    ///
    /// `NotFound` if the account is absent; `PhotoCleanupFailed` when the
    /// record is gone but the blob survived.
    pub async fn delete(&self, id: Uuid) -> Result<User, AccountError> {
        let user = self
            .repo
            .get_by_id(id)
            .await?
            .ok_or(AccountError::NotFound(id))?;

        self.repo.delete(id).await?;

        if !user.photo_key.is_empty() {
            if let Err(e) = self.store.delete(&user.photo_key).await {
                tracing::error!(
                    user_id = %id,
                    key = %user.photo_key,
                    error = %e,
                    "record deleted but photo cleanup failed; blob needs manual reconciliation"
                );
                return Err(AccountError::PhotoCleanupFailed {
                    id,
                    key: user.photo_key.clone(),
                });
            }
        }

        Ok(user)
    }

    /// Verify a plaintext password against the stored hash.
    ///
    /// # Errors
    ///
    /// `Unauthenticated` on a mismatch. A missing account yields the same
    /// error so callers cannot probe which ids exist.
    pub async fn check_password(&self, id: Uuid, password: &str) -> Result<(), AccountError> {
        let Some(user) = self.repo.get_by_id(id).await? else {
            return Err(AccountError::Unauthenticated);
        };

        if verify_password(password, &user.password_hash)? {
            Ok(())
        } else {
            Err(AccountError::Unauthenticated)
        }
    }

    /// Look up a user by id.
    ///
    /// # Errors
    ///
    /// `NotFound` if the account is absent.
    pub async fn get_by_id(&self, id: Uuid) -> Result<User, AccountError> {
        self.repo
            .get_by_id(id)
            .await?
            .ok_or(AccountError::NotFound(id))
    }

    /// Look up a user by email.
    ///
    /// # Errors
    ///
    /// `EmailNotFound` if no account has this email.
    pub async fn get_by_email(&self, email: &str) -> Result<User, AccountError> {
        self.repo
            .get_by_email(email)
            .await?
            .ok_or_else(|| AccountError::EmailNotFound(email.to_string()))
    }

    /// Fetch a batch of users. Empty input returns an empty result; unknown
    /// ids are silently omitted.
    ///
    /// # Errors
    ///
    /// Only on repository failure; nothing matching is not an error.
    pub async fn get_many(&self, ids: &[Uuid]) -> Result<Vec<User>, AccountError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        self.repo.get_many(ids).await
    }

    /// List users with the given role tag.
    ///
    /// # Errors
    ///
    /// `InvalidInput` on an unknown role; an empty result is not an error.
    pub async fn list_by_role(&self, role: &str) -> Result<Vec<User>, AccountError> {
        let role = UserRole::parse(role)
            .ok_or_else(|| AccountError::invalid_input(format!("unknown role '{role}'")))?;
        self.repo.get_by_role(role).await
    }
}
