//! Coach orchestration service.
//!
//! Same photo coordination discipline as the user service; coaches carry no
//! email, role, or credentials.

use std::sync::Arc;

use chrono::Utc;
use tracing::warn;
use uuid::Uuid;

use crate::storage::ObjectStorage;

use super::error::AccountError;
use super::photos::{PhotoReplacement, discard_uploaded_blob, rollback_replacement};
use super::repository::CoachRepository;
use super::types::{
    Coach, CoachFieldPatch, CreateCoachInput, UpdateCoachInput, coach_photo_key, provided,
};

/// Orchestrates coach create/update/delete across the repository and the
/// object store.
pub struct CoachService<R, S> {
    repo: Arc<R>,
    store: Arc<S>,
}

impl<R: CoachRepository, S: ObjectStorage> CoachService<R, S> {
    /// Create a new coach service.
    #[must_use]
    pub fn new(repo: Arc<R>, store: Arc<S>) -> Self {
        Self { repo, store }
    }

    /// Create a coach. Photo upload precedes persistence; a persistence
    /// failure deletes the uploaded blob best-effort.
    ///
    /// # Errors
    ///
    /// `InvalidInput` on a missing name, plus adapter failures.
    pub async fn create(&self, input: CreateCoachInput) -> Result<Coach, AccountError> {
        if input.name.is_empty() {
            return Err(AccountError::invalid_input("name is required"));
        }

        let id = Uuid::new_v4();

        let mut photo_url = String::new();
        let mut photo_key = String::new();
        let mut uploaded = false;
        if let Some(bytes) = input.photo {
            let key = coach_photo_key(id);
            photo_url = self.store.put(bytes, &key).await?;
            photo_key = key;
            uploaded = true;
        }

        let now = Utc::now();
        let record = Coach {
            id,
            name: input.name,
            description: input.description,
            photo_url,
            photo_key: photo_key.clone(),
            created_at: now,
            updated_at: now,
        };

        match self.repo.create(record).await {
            Ok(coach) => Ok(coach),
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
    /// # Errors
    ///
    /// `NotFound` if the coach is absent, plus adapter failures.
    pub async fn update(&self, id: Uuid, input: UpdateCoachInput) -> Result<Coach, AccountError> {
        let name = provided(input.name);
        let description = provided(input.description);

        let current = self
            .repo
            .get_by_id(id)
            .await?
            .ok_or(AccountError::NotFound(id))?;

        let mut replacement: Option<PhotoReplacement> = None;
        let mut photo_url = None;
        let mut photo_key = None;
        if let Some(bytes) = input.photo {
            let key = coach_photo_key(id);
            let previous = if current.photo_key == key && self.store.exists(&key).await? {
                Some(self.store.get(&key).await?)
            } else {
                None
            };
            photo_url = Some(self.store.put(bytes, &key).await?);
            photo_key = Some(key.clone());
            replacement = Some(PhotoReplacement { key, previous });
        }

        let patch = CoachFieldPatch {
            name,
            description,
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

        if replacement.is_some()
            && !current.photo_key.is_empty()
            && current.photo_key != coach_photo_key(id)
        {
            if let Err(e) = self.store.delete(&current.photo_key).await {
                warn!(
                    coach_id = %id,
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

    /// Delete a coach and its stored photo. The record deletion is
    /// authoritative; blob cleanup failure surfaces as `PhotoCleanupFailed`.
    ///
    /// # Errors
    ///
    /// `NotFound` if the coach is absent; `PhotoCleanupFailed` when the
    /// record is gone but the blob survived.
    pub async fn delete(&self, id: Uuid) -> Result<Coach, AccountError> {
        let coach = self
            .repo
            .get_by_id(id)
            .await?
            .ok_or(AccountError::NotFound(id))?;

        self.repo.delete(id).await?;

        if !coach.photo_key.is_empty() {
            if let Err(e) = self.store.delete(&coach.photo_key).await {
                tracing::error!(
                    coach_id = %id,
                    key = %coach.photo_key,
                    error = %e,
                    "record deleted but photo cleanup failed; blob needs manual reconciliation"
                );
                return Err(AccountError::PhotoCleanupFailed {
                    id,
                    key: coach.photo_key.clone(),
                });
            }
        }

        Ok(coach)
    }

    /// Look up a coach by id.
    ///
    /// # Errors
    ///
    /// `NotFound` if the coach is absent.
    pub async fn get_by_id(&self, id: Uuid) -> Result<Coach, AccountError> {
        self.repo
            .get_by_id(id)
            .await?
            .ok_or(AccountError::NotFound(id))
    }

    /// List all coaches. An empty result is not an error.
    ///
    /// # Errors
    ///
    /// Only on repository failure.
    pub async fn list(&self) -> Result<Vec<Coach>, AccountError> {
        self.repo.get_all().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::account::testing::{MockCoachRepository, MockObjectStore};
    use bytes::Bytes;

    fn service() -> (
        Arc<MockCoachRepository>,
        Arc<MockObjectStore>,
        CoachService<MockCoachRepository, MockObjectStore>,
    ) {
        let repo = Arc::new(MockCoachRepository::new());
        let store = Arc::new(MockObjectStore::new());
        let service = CoachService::new(repo.clone(), store.clone());
        (repo, store, service)
    }

    fn create_input(photo: Option<Bytes>) -> CreateCoachInput {
        CreateCoachInput {
            name: "Carl".to_string(),
            description: "Strength coach".to_string(),
            photo,
        }
    }

    #[tokio::test]
    async fn test_create_with_photo() {
        let (repo, store, service) = service();
        let photo = Bytes::from_static(b"portrait");

        let coach = service.create(create_input(Some(photo.clone()))).await.unwrap();

        assert_eq!(coach.photo_key, coach_photo_key(coach.id));
        assert_eq!(store.blob(&coach.photo_key), Some(photo));
        assert!(repo.coach(coach.id).is_some());
    }

    #[tokio::test]
    async fn test_create_requires_name() {
        let (_repo, _store, service) = service();

        let mut input = create_input(None);
        input.name = String::new();

        let err = service.create(input).await.unwrap_err();
        assert!(matches!(err, AccountError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn test_create_persistence_failure_cleans_up_blob() {
        let (repo, store, service) = service();
        repo.fail_on_create();

        let err = service
            .create(create_input(Some(Bytes::from_static(b"x"))))
            .await
            .unwrap_err();

        assert!(matches!(err, AccountError::Repository(_)));
        assert!(repo.is_empty());
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_update_partial_fields() {
        let (_repo, _store, service) = service();

        let created = service.create(create_input(None)).await.unwrap();

        tokio::time::sleep(std::time::Duration::from_millis(2)).await;

        let updated = service
            .update(
                created.id,
                UpdateCoachInput {
                    description: Some("Conditioning coach".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.name, created.name);
        assert_eq!(updated.description, "Conditioning coach");
        assert!(updated.updated_at > created.updated_at);
    }

    #[tokio::test]
    async fn test_update_failure_restores_previous_photo() {
        let (repo, store, service) = service();

        let created = service
            .create(create_input(Some(Bytes::from_static(b"old"))))
            .await
            .unwrap();

        repo.fail_on_update();

        let err = service
            .update(
                created.id,
                UpdateCoachInput {
                    photo: Some(Bytes::from_static(b"new")),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();

        assert!(matches!(err, AccountError::Repository(_)));
        assert_eq!(
            store.blob(&created.photo_key),
            Some(Bytes::from_static(b"old"))
        );
    }

    #[tokio::test]
    async fn test_delete_reports_photo_cleanup_failure() {
        let (repo, store, service) = service();

        let created = service
            .create(create_input(Some(Bytes::from_static(b"x"))))
            .await
            .unwrap();

        store.fail_on_delete();

        let err = service.delete(created.id).await.unwrap_err();

        assert!(matches!(err, AccountError::PhotoCleanupFailed { .. }));
        assert!(repo.coach(created.id).is_none());
    }

    #[tokio::test]
    async fn test_list() {
        let (_repo, _store, service) = service();

        assert!(service.list().await.unwrap().is_empty());

        service.create(create_input(None)).await.unwrap();
        assert_eq!(service.list().await.unwrap().len(), 1);
    }
}
