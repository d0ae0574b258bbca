//! User repository for database operations.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, Set,
    Unchanged,
};
use uuid::Uuid;

use crate::entities::users;
use fitbase_core::account::{
    AccountError, User, UserFieldPatch, UserRepository as UserRepoTrait, UserRole,
};

/// User repository implementation.
#[derive(Debug, Clone)]
pub struct UserRepository {
    db: DatabaseConnection,
}

impl UserRepository {
    /// Creates a new user repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

impl UserRepoTrait for UserRepository {
    async fn create(&self, user: User) -> Result<User, AccountError> {
        let active_model = users::ActiveModel {
            id: Set(user.id),
            name: Set(user.name.clone()),
            email: Set(user.email.clone()),
            role: Set(user.role.as_str().to_string()),
            password_hash: Set(user.password_hash.clone()),
            photo_url: Set(user.photo_url.clone()),
            photo_key: Set(user.photo_key.clone()),
            created_at: Set(user.created_at.into()),
            updated_at: Set(user.updated_at.into()),
        };

        let model = active_model
            .insert(&self.db)
            .await
            .map_err(|e| AccountError::repository(e.to_string()))?;

        to_domain(model)
    }

    async fn get_by_id(&self, id: Uuid) -> Result<Option<User>, AccountError> {
        let model = users::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| AccountError::repository(e.to_string()))?;

        model.map(to_domain).transpose()
    }

    async fn get_by_email(&self, email: &str) -> Result<Option<User>, AccountError> {
        let model = users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(|e| AccountError::repository(e.to_string()))?;

        model.map(to_domain).transpose()
    }

    async fn update_fields(&self, id: Uuid, patch: UserFieldPatch) -> Result<(), AccountError> {
        let mut model = users::ActiveModel {
            id: Unchanged(id),
            ..Default::default()
        };

        if let Some(name) = patch.name {
            model.name = Set(name);
        }
        if let Some(email) = patch.email {
            model.email = Set(email);
        }
        if let Some(role) = patch.role {
            model.role = Set(role.as_str().to_string());
        }
        if let Some(photo_url) = patch.photo_url {
            model.photo_url = Set(photo_url);
        }
        if let Some(photo_key) = patch.photo_key {
            model.photo_key = Set(photo_key);
        }
        model.updated_at = Set(patch.updated_at.into());

        match model.update(&self.db).await {
            Ok(_) => Ok(()),
            Err(DbErr::RecordNotUpdated) => Err(AccountError::NotFound(id)),
            Err(e) => Err(AccountError::repository(e.to_string())),
        }
    }

    async fn delete(&self, id: Uuid) -> Result<(), AccountError> {
        let result = users::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| AccountError::repository(e.to_string()))?;

        if result.rows_affected == 0 {
            return Err(AccountError::NotFound(id));
        }

        Ok(())
    }

    async fn get_many(&self, ids: &[Uuid]) -> Result<Vec<User>, AccountError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let models = users::Entity::find()
            .filter(users::Column::Id.is_in(ids.iter().copied()))
            .all(&self.db)
            .await
            .map_err(|e| AccountError::repository(e.to_string()))?;

        models.into_iter().map(to_domain).collect()
    }

    async fn get_by_role(&self, role: UserRole) -> Result<Vec<User>, AccountError> {
        let models = users::Entity::find()
            .filter(users::Column::Role.eq(role.as_str()))
            .all(&self.db)
            .await
            .map_err(|e| AccountError::repository(e.to_string()))?;

        models.into_iter().map(to_domain).collect()
    }
}

/// Convert a database model to the domain record.
fn to_domain(model: users::Model) -> Result<User, AccountError> {
    let role = UserRole::parse(&model.role)
        .ok_or_else(|| AccountError::repository(format!("invalid role in row: {}", model.role)))?;

    Ok(User {
        id: model.id,
        name: model.name,
        email: model.email,
        role,
        password_hash: model.password_hash,
        photo_url: model.photo_url,
        photo_key: model.photo_key,
        created_at: model.created_at.with_timezone(&Utc),
        updated_at: model.updated_at.with_timezone(&Utc),
    })
}
