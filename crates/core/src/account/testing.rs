//! In-memory fakes for orchestrator tests.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use bytes::Bytes;
use uuid::Uuid;

use crate::storage::{ObjectStorage, StorageError};

use super::error::AccountError;
use super::repository::{CoachRepository, UserRepository};
use super::types::{Coach, CoachFieldPatch, User, UserFieldPatch, UserRole};

/// In-memory user repository with switchable failure points.
pub(crate) struct MockUserRepository {
    users: Mutex<HashMap<Uuid, User>>,
    fail_create: AtomicBool,
    fail_update: AtomicBool,
}

impl MockUserRepository {
    pub(crate) fn new() -> Self {
        Self {
            users: Mutex::new(HashMap::new()),
            fail_create: AtomicBool::new(false),
            fail_update: AtomicBool::new(false),
        }
    }

    pub(crate) fn fail_on_create(&self) {
        self.fail_create.store(true, Ordering::SeqCst);
    }

    pub(crate) fn fail_on_update(&self) {
        self.fail_update.store(true, Ordering::SeqCst);
    }

    pub(crate) fn user(&self, id: Uuid) -> Option<User> {
        self.users.lock().unwrap().get(&id).cloned()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.users.lock().unwrap().is_empty()
    }
}

impl UserRepository for MockUserRepository {
    async fn create(&self, user: User) -> Result<User, AccountError> {
        if self.fail_create.load(Ordering::SeqCst) {
            return Err(AccountError::repository("insert failed"));
        }
        self.users.lock().unwrap().insert(user.id, user.clone());
        Ok(user)
    }

    async fn get_by_id(&self, id: Uuid) -> Result<Option<User>, AccountError> {
        Ok(self.users.lock().unwrap().get(&id).cloned())
    }

    async fn get_by_email(&self, email: &str) -> Result<Option<User>, AccountError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .values()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn update_fields(&self, id: Uuid, patch: UserFieldPatch) -> Result<(), AccountError> {
        if self.fail_update.load(Ordering::SeqCst) {
            return Err(AccountError::repository("update failed"));
        }
        let mut users = self.users.lock().unwrap();
        let user = users.get_mut(&id).ok_or(AccountError::NotFound(id))?;
        if let Some(name) = patch.name {
            user.name = name;
        }
        if let Some(email) = patch.email {
            user.email = email;
        }
        if let Some(role) = patch.role {
            user.role = role;
        }
        if let Some(photo_url) = patch.photo_url {
            user.photo_url = photo_url;
        }
        if let Some(photo_key) = patch.photo_key {
            user.photo_key = photo_key;
        }
        user.updated_at = patch.updated_at;
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<(), AccountError> {
        self.users
            .lock()
            .unwrap()
            .remove(&id)
            .map(|_| ())
            .ok_or(AccountError::NotFound(id))
    }

    async fn get_many(&self, ids: &[Uuid]) -> Result<Vec<User>, AccountError> {
        let users = self.users.lock().unwrap();
        Ok(ids.iter().filter_map(|id| users.get(id).cloned()).collect())
    }

    async fn get_by_role(&self, role: UserRole) -> Result<Vec<User>, AccountError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .values()
            .filter(|u| u.role == role)
            .cloned()
            .collect())
    }
}

/// In-memory coach repository with switchable failure points.
pub(crate) struct MockCoachRepository {
    coaches: Mutex<HashMap<Uuid, Coach>>,
    fail_create: AtomicBool,
    fail_update: AtomicBool,
}

impl MockCoachRepository {
    pub(crate) fn new() -> Self {
        Self {
            coaches: Mutex::new(HashMap::new()),
            fail_create: AtomicBool::new(false),
            fail_update: AtomicBool::new(false),
        }
    }

    pub(crate) fn fail_on_create(&self) {
        self.fail_create.store(true, Ordering::SeqCst);
    }

    pub(crate) fn fail_on_update(&self) {
        self.fail_update.store(true, Ordering::SeqCst);
    }

    pub(crate) fn coach(&self, id: Uuid) -> Option<Coach> {
        self.coaches.lock().unwrap().get(&id).cloned()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.coaches.lock().unwrap().is_empty()
    }
}

impl CoachRepository for MockCoachRepository {
    async fn create(&self, coach: Coach) -> Result<Coach, AccountError> {
        if self.fail_create.load(Ordering::SeqCst) {
            return Err(AccountError::repository("insert failed"));
        }
        self.coaches.lock().unwrap().insert(coach.id, coach.clone());
        Ok(coach)
    }

    async fn get_by_id(&self, id: Uuid) -> Result<Option<Coach>, AccountError> {
        Ok(self.coaches.lock().unwrap().get(&id).cloned())
    }

    async fn update_fields(&self, id: Uuid, patch: CoachFieldPatch) -> Result<(), AccountError> {
        if self.fail_update.load(Ordering::SeqCst) {
            return Err(AccountError::repository("update failed"));
        }
        let mut coaches = self.coaches.lock().unwrap();
        let coach = coaches.get_mut(&id).ok_or(AccountError::NotFound(id))?;
        if let Some(name) = patch.name {
            coach.name = name;
        }
        if let Some(description) = patch.description {
            coach.description = description;
        }
        if let Some(photo_url) = patch.photo_url {
            coach.photo_url = photo_url;
        }
        if let Some(photo_key) = patch.photo_key {
            coach.photo_key = photo_key;
        }
        coach.updated_at = patch.updated_at;
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<(), AccountError> {
        self.coaches
            .lock()
            .unwrap()
            .remove(&id)
            .map(|_| ())
            .ok_or(AccountError::NotFound(id))
    }

    async fn get_all(&self) -> Result<Vec<Coach>, AccountError> {
        Ok(self.coaches.lock().unwrap().values().cloned().collect())
    }
}

/// In-memory object store with switchable failure points.
pub(crate) struct MockObjectStore {
    blobs: Mutex<HashMap<String, Bytes>>,
    fail_put: AtomicBool,
    fail_delete: AtomicBool,
}

impl MockObjectStore {
    pub(crate) fn new() -> Self {
        Self {
            blobs: Mutex::new(HashMap::new()),
            fail_put: AtomicBool::new(false),
            fail_delete: AtomicBool::new(false),
        }
    }

    pub(crate) fn fail_on_put(&self) {
        self.fail_put.store(true, Ordering::SeqCst);
    }

    pub(crate) fn fail_on_delete(&self) {
        self.fail_delete.store(true, Ordering::SeqCst);
    }

    pub(crate) fn blob(&self, key: &str) -> Option<Bytes> {
        self.blobs.lock().unwrap().get(key).cloned()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.blobs.lock().unwrap().is_empty()
    }

    pub(crate) fn insert(&self, key: &str, bytes: Bytes) {
        self.blobs.lock().unwrap().insert(key.to_string(), bytes);
    }
}

impl ObjectStorage for MockObjectStore {
    async fn put(&self, bytes: Bytes, key: &str) -> Result<String, StorageError> {
        if self.fail_put.load(Ordering::SeqCst) {
            return Err(StorageError::operation("put failed"));
        }
        self.blobs.lock().unwrap().insert(key.to_string(), bytes);
        Ok(format!("mock://{key}"))
    }

    async fn get(&self, key: &str) -> Result<Bytes, StorageError> {
        self.blobs
            .lock()
            .unwrap()
            .get(key)
            .cloned()
            .ok_or_else(|| StorageError::not_found(key))
    }

    async fn delete(&self, key: &str) -> Result<(), StorageError> {
        if self.fail_delete.load(Ordering::SeqCst) {
            return Err(StorageError::operation("delete failed"));
        }
        self.blobs.lock().unwrap().remove(key);
        Ok(())
    }

    async fn exists(&self, key: &str) -> Result<bool, StorageError> {
        Ok(self.blobs.lock().unwrap().contains_key(key))
    }
}
