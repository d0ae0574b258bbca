//! User management routes.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{error, info};
use uuid::Uuid;

use crate::{AppState, multipart::read_upload, routes::error_response};
use fitbase_core::account::{AccountError, CreateUserInput, UpdateUserInput, User, UserService};
use fitbase_core::storage::StorageService;
use fitbase_db::UserRepository;

/// Creates the user routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/users", post(create_user).get(list_users_by_role))
        .route("/users/batch", post(get_users_by_ids))
        .route("/users/by-email/{email}", get(get_user_by_email))
        .route(
            "/users/{id}",
            get(get_user).put(update_user).delete(delete_user),
        )
        .route("/users/{id}/check-password", post(check_password))
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Metadata part of a streamed create-user request.
#[derive(Debug, Deserialize)]
pub struct CreateUserData {
    /// Display name.
    pub name: String,
    /// Email address.
    pub email: String,
    /// Role tag: client, admin, or coach.
    pub role: String,
    /// Plaintext password.
    pub password: String,
}

/// Metadata part of a streamed update-user request. Absent fields leave the
/// stored values unchanged.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateUserData {
    /// Replacement display name.
    #[serde(default)]
    pub name: Option<String>,
    /// Replacement email.
    #[serde(default)]
    pub email: Option<String>,
    /// Replacement role tag.
    #[serde(default)]
    pub role: Option<String>,
}

/// Request body for a batch lookup.
#[derive(Debug, Deserialize)]
pub struct BatchRequest {
    /// Account ids to fetch. Unknown ids are silently omitted.
    pub ids: Vec<Uuid>,
}

/// Request body for a password check.
#[derive(Debug, Deserialize)]
pub struct CheckPasswordRequest {
    /// Plaintext password to verify.
    pub password: String,
}

/// Query parameters for the role listing.
#[derive(Debug, Deserialize)]
pub struct RoleQuery {
    /// Role tag to filter on.
    pub role: Option<String>,
}

/// Response for a user account. The password hash never leaves the service.
#[derive(Debug, Serialize)]
pub struct UserResponse {
    /// Account id.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// Email address.
    pub email: String,
    /// Role tag.
    pub role: String,
    /// Public photo URL, empty if no photo is stored.
    pub photo: String,
    /// Creation timestamp (ISO 8601).
    pub created_at: String,
    /// Last mutation timestamp (ISO 8601).
    pub updated_at: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            role: user.role.as_str().to_string(),
            photo: user.photo_url,
            created_at: user.created_at.to_rfc3339(),
            updated_at: user.updated_at.to_rfc3339(),
        }
    }
}

// ============================================================================
// Route Handlers
// ============================================================================

/// Build a user service bound to this request's state.
fn user_service(state: &AppState) -> UserService<UserRepository, StorageService> {
    let repo = UserRepository::new((*state.db).clone());
    UserService::new(Arc::new(repo), state.storage.clone())
}

/// POST `/users` - Create a user from a streamed metadata+photo request.
async fn create_user(State(state): State<AppState>, mut multipart: Multipart) -> impl IntoResponse {
    let assembled = match read_upload::<CreateUserData>(&mut multipart).await {
        Ok(assembled) => assembled,
        Err(e) => {
            error!(error = %e, "Failed to read create-user stream");
            return error_response(&e.into());
        }
    };

    let Some(data) = assembled.metadata else {
        return error_response(&AccountError::invalid_input("user data is empty"));
    };

    let input = CreateUserInput {
        name: data.name,
        email: data.email,
        role: data.role,
        password: data.password,
        photo: assembled.photo,
    };

    match user_service(&state).create(input).await {
        Ok(user) => {
            info!(user_id = %user.id, "User created");
            (StatusCode::CREATED, Json(UserResponse::from(user))).into_response()
        }
        Err(e) => {
            error!(error = %e, "Failed to create user");
            error_response(&e)
        }
    }
}

/// GET `/users/{id}` - Fetch a user by id.
async fn get_user(State(state): State<AppState>, Path(id): Path<Uuid>) -> impl IntoResponse {
    match user_service(&state).get_by_id(id).await {
        Ok(user) => (StatusCode::OK, Json(UserResponse::from(user))).into_response(),
        Err(e) => {
            error!(user_id = %id, error = %e, "Failed to get user");
            error_response(&e)
        }
    }
}

/// GET `/users/by-email/{email}` - Fetch a user by email.
async fn get_user_by_email(
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> impl IntoResponse {
    match user_service(&state).get_by_email(&email).await {
        Ok(user) => (StatusCode::OK, Json(UserResponse::from(user))).into_response(),
        Err(e) => {
            error!(error = %e, "Failed to get user by email");
            error_response(&e)
        }
    }
}

/// PUT `/users/{id}` - Apply a streamed partial update.
async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    mut multipart: Multipart,
) -> impl IntoResponse {
    let assembled = match read_upload::<UpdateUserData>(&mut multipart).await {
        Ok(assembled) => assembled,
        Err(e) => {
            error!(user_id = %id, error = %e, "Failed to read update-user stream");
            return error_response(&e.into());
        }
    };

    let data = assembled.metadata.unwrap_or_default();
    let input = UpdateUserInput {
        name: data.name,
        email: data.email,
        role: data.role,
        photo: assembled.photo,
    };

    match user_service(&state).update(id, input).await {
        Ok(user) => {
            info!(user_id = %id, "User updated");
            (StatusCode::OK, Json(UserResponse::from(user))).into_response()
        }
        Err(e) => {
            error!(user_id = %id, error = %e, "Failed to update user");
            error_response(&e)
        }
    }
}

/// DELETE `/users/{id}` - Delete a user and its photo; returns the deleted
/// record.
async fn delete_user(State(state): State<AppState>, Path(id): Path<Uuid>) -> impl IntoResponse {
    match user_service(&state).delete(id).await {
        Ok(user) => {
            info!(user_id = %id, "User deleted");
            (StatusCode::OK, Json(UserResponse::from(user))).into_response()
        }
        Err(e) => {
            error!(user_id = %id, error = %e, "Failed to delete user");
            error_response(&e)
        }
    }
}

/// POST `/users/batch` - Fetch a batch of users by id.
async fn get_users_by_ids(
    State(state): State<AppState>,
    Json(payload): Json<BatchRequest>,
) -> impl IntoResponse {
    match user_service(&state).get_many(&payload.ids).await {
        Ok(users) => {
            let items: Vec<UserResponse> = users.into_iter().map(UserResponse::from).collect();
            (StatusCode::OK, Json(json!({ "users": items }))).into_response()
        }
        Err(e) => {
            error!(error = %e, "Failed to fetch users batch");
            error_response(&e)
        }
    }
}

/// GET `/users?role=client` - List users with the given role.
async fn list_users_by_role(
    State(state): State<AppState>,
    Query(query): Query<RoleQuery>,
) -> impl IntoResponse {
    let Some(role) = query.role else {
        return error_response(&AccountError::invalid_input(
            "role query parameter is required",
        ));
    };

    match user_service(&state).list_by_role(&role).await {
        Ok(users) => {
            let items: Vec<UserResponse> = users.into_iter().map(UserResponse::from).collect();
            (StatusCode::OK, Json(json!({ "users": items }))).into_response()
        }
        Err(e) => {
            error!(role = %role, error = %e, "Failed to list users by role");
            error_response(&e)
        }
    }
}

/// POST `/users/{id}/check-password` - Verify credentials; returns no data.
async fn check_password(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<CheckPasswordRequest>,
) -> impl IntoResponse {
    match user_service(&state)
        .check_password(id, &payload.password)
        .await
    {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => {
            // The plaintext is never logged, only the outcome.
            info!(user_id = %id, "Password check failed");
            error_response(&e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use fitbase_core::account::UserRole;

    #[test]
    fn test_user_response_omits_password_hash() {
        let user = User {
            id: Uuid::new_v4(),
            name: "Alice".to_string(),
            email: "alice@example.com".to_string(),
            role: UserRole::Client,
            password_hash: "$argon2id$secret".to_string(),
            photo_url: "http://localhost/photos/user/x".to_string(),
            photo_key: "user/x".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let body = serde_json::to_value(UserResponse::from(user)).unwrap();

        assert_eq!(body["role"], "client");
        assert!(body.get("password_hash").is_none());
        assert!(body.get("photo_key").is_none());
        assert!(!body["photo"].as_str().unwrap().is_empty());
    }

    #[test]
    fn test_update_data_defaults_to_unset() {
        let data: UpdateUserData = serde_json::from_str("{}").unwrap();
        assert!(data.name.is_none());
        assert!(data.email.is_none());
        assert!(data.role.is_none());
    }
}
