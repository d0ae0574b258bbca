//! Coach management routes.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Multipart, Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{error, info};
use uuid::Uuid;

use crate::{AppState, multipart::read_upload, routes::error_response};
use fitbase_core::account::{
    AccountError, Coach, CoachService, CreateCoachInput, UpdateCoachInput,
};
use fitbase_core::storage::StorageService;
use fitbase_db::CoachRepository;

/// Creates the coach routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/coaches", post(create_coach).get(list_coaches))
        .route(
            "/coaches/{id}",
            get(get_coach).put(update_coach).delete(delete_coach),
        )
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Metadata part of a streamed create-coach request.
#[derive(Debug, Deserialize)]
pub struct CreateCoachData {
    /// Display name.
    pub name: String,
    /// Free-form description.
    #[serde(default)]
    pub description: String,
}

/// Metadata part of a streamed update-coach request.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateCoachData {
    /// Replacement display name.
    #[serde(default)]
    pub name: Option<String>,
    /// Replacement description.
    #[serde(default)]
    pub description: Option<String>,
}

/// Response for a coach account.
#[derive(Debug, Serialize)]
pub struct CoachResponse {
    /// Account id.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// Free-form description.
    pub description: String,
    /// Public photo URL, empty if no photo is stored.
    pub photo: String,
    /// Creation timestamp (ISO 8601).
    pub created_at: String,
    /// Last mutation timestamp (ISO 8601).
    pub updated_at: String,
}

impl From<Coach> for CoachResponse {
    fn from(coach: Coach) -> Self {
        Self {
            id: coach.id,
            name: coach.name,
            description: coach.description,
            photo: coach.photo_url,
            created_at: coach.created_at.to_rfc3339(),
            updated_at: coach.updated_at.to_rfc3339(),
        }
    }
}

// ============================================================================
// Route Handlers
// ============================================================================

/// Build a coach service bound to this request's state.
fn coach_service(state: &AppState) -> CoachService<CoachRepository, StorageService> {
    let repo = CoachRepository::new((*state.db).clone());
    CoachService::new(Arc::new(repo), state.storage.clone())
}

/// POST `/coaches` - Create a coach from a streamed metadata+photo request.
async fn create_coach(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> impl IntoResponse {
    let assembled = match read_upload::<CreateCoachData>(&mut multipart).await {
        Ok(assembled) => assembled,
        Err(e) => {
            error!(error = %e, "Failed to read create-coach stream");
            return error_response(&e.into());
        }
    };

    let Some(data) = assembled.metadata else {
        return error_response(&AccountError::invalid_input("coach data is empty"));
    };

    let input = CreateCoachInput {
        name: data.name,
        description: data.description,
        photo: assembled.photo,
    };

    match coach_service(&state).create(input).await {
        Ok(coach) => {
            info!(coach_id = %coach.id, "Coach created");
            (StatusCode::CREATED, Json(CoachResponse::from(coach))).into_response()
        }
        Err(e) => {
            error!(error = %e, "Failed to create coach");
            error_response(&e)
        }
    }
}

/// GET `/coaches/{id}` - Fetch a coach by id.
async fn get_coach(State(state): State<AppState>, Path(id): Path<Uuid>) -> impl IntoResponse {
    match coach_service(&state).get_by_id(id).await {
        Ok(coach) => (StatusCode::OK, Json(CoachResponse::from(coach))).into_response(),
        Err(e) => {
            error!(coach_id = %id, error = %e, "Failed to get coach");
            error_response(&e)
        }
    }
}

/// PUT `/coaches/{id}` - Apply a streamed partial update.
async fn update_coach(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    mut multipart: Multipart,
) -> impl IntoResponse {
    let assembled = match read_upload::<UpdateCoachData>(&mut multipart).await {
        Ok(assembled) => assembled,
        Err(e) => {
            error!(coach_id = %id, error = %e, "Failed to read update-coach stream");
            return error_response(&e.into());
        }
    };

    let data = assembled.metadata.unwrap_or_default();
    let input = UpdateCoachInput {
        name: data.name,
        description: data.description,
        photo: assembled.photo,
    };

    match coach_service(&state).update(id, input).await {
        Ok(coach) => {
            info!(coach_id = %id, "Coach updated");
            (StatusCode::OK, Json(CoachResponse::from(coach))).into_response()
        }
        Err(e) => {
            error!(coach_id = %id, error = %e, "Failed to update coach");
            error_response(&e)
        }
    }
}

/// DELETE `/coaches/{id}` - Delete a coach and its photo; returns the
/// deleted record.
async fn delete_coach(State(state): State<AppState>, Path(id): Path<Uuid>) -> impl IntoResponse {
    match coach_service(&state).delete(id).await {
        Ok(coach) => {
            info!(coach_id = %id, "Coach deleted");
            (StatusCode::OK, Json(CoachResponse::from(coach))).into_response()
        }
        Err(e) => {
            error!(coach_id = %id, error = %e, "Failed to delete coach");
            error_response(&e)
        }
    }
}

/// GET `/coaches` - List all coaches.
async fn list_coaches(State(state): State<AppState>) -> impl IntoResponse {
    match coach_service(&state).list().await {
        Ok(coaches) => {
            let items: Vec<CoachResponse> = coaches.into_iter().map(CoachResponse::from).collect();
            (StatusCode::OK, Json(json!({ "coaches": items }))).into_response()
        }
        Err(e) => {
            error!(error = %e, "Failed to list coaches");
            error_response(&e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_data_description_defaults_empty() {
        let data: CreateCoachData = serde_json::from_str(r#"{"name":"Carl"}"#).unwrap();
        assert_eq!(data.name, "Carl");
        assert!(data.description.is_empty());
    }

    #[test]
    fn test_update_data_defaults_to_unset() {
        let data: UpdateCoachData = serde_json::from_str("{}").unwrap();
        assert!(data.name.is_none());
        assert!(data.description.is_none());
    }
}
