//! Coach repository for database operations.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, DatabaseConnection, DbErr, EntityTrait, QueryOrder, Set, Unchanged,
};
use uuid::Uuid;

use crate::entities::coaches;
use fitbase_core::account::{
    AccountError, Coach, CoachFieldPatch, CoachRepository as CoachRepoTrait,
};

/// Coach repository implementation.
#[derive(Debug, Clone)]
pub struct CoachRepository {
    db: DatabaseConnection,
}

impl CoachRepository {
    /// Creates a new coach repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

impl CoachRepoTrait for CoachRepository {
    async fn create(&self, coach: Coach) -> Result<Coach, AccountError> {
        let active_model = coaches::ActiveModel {
            id: Set(coach.id),
            name: Set(coach.name.clone()),
            description: Set(coach.description.clone()),
            photo_url: Set(coach.photo_url.clone()),
            photo_key: Set(coach.photo_key.clone()),
            created_at: Set(coach.created_at.into()),
            updated_at: Set(coach.updated_at.into()),
        };

        let model = active_model
            .insert(&self.db)
            .await
            .map_err(|e| AccountError::repository(e.to_string()))?;

        Ok(to_domain(model))
    }

    async fn get_by_id(&self, id: Uuid) -> Result<Option<Coach>, AccountError> {
        let model = coaches::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| AccountError::repository(e.to_string()))?;

        Ok(model.map(to_domain))
    }

    async fn update_fields(&self, id: Uuid, patch: CoachFieldPatch) -> Result<(), AccountError> {
        let mut model = coaches::ActiveModel {
            id: Unchanged(id),
            ..Default::default()
        };

        if let Some(name) = patch.name {
            model.name = Set(name);
        }
        if let Some(description) = patch.description {
            model.description = Set(description);
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
        let result = coaches::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| AccountError::repository(e.to_string()))?;

        if result.rows_affected == 0 {
            return Err(AccountError::NotFound(id));
        }

        Ok(())
    }

    async fn get_all(&self) -> Result<Vec<Coach>, AccountError> {
        let models = coaches::Entity::find()
            .order_by_asc(coaches::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(|e| AccountError::repository(e.to_string()))?;

        Ok(models.into_iter().map(to_domain).collect())
    }
}

/// Convert a database model to the domain record.
fn to_domain(model: coaches::Model) -> Coach {
    Coach {
        id: model.id,
        name: model.name,
        description: model.description,
        photo_url: model.photo_url,
        photo_key: model.photo_key,
        created_at: model.created_at.with_timezone(&Utc),
        updated_at: model.updated_at.with_timezone(&Utc),
    }
}
