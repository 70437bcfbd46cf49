// HTTP handlers for user endpoints. Every route sits behind `authenticate_token`.

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    Json,
};
use tracing::{debug, error, info, warn};
use validator::Validate;

use crate::auth::AuthContext;
use crate::error::ApiError;
use crate::users::{
    error::StoreError,
    models::{UpdateUserRequest, UserEnvelope, UserResponse, UsersResponse},
    policy,
};
use crate::validation::{json_body, user_id_param};
use crate::AppState;

fn user_not_found() -> ApiError {
    ApiError::NotFound("User not found".to_string())
}

/// List every user
/// GET /api/users
#[utoipa::path(
    get,
    path = "/api/users",
    responses(
        (status = 200, description = "All users", body = UsersResponse),
        (status = 401, description = "No token cookie", body = ErrorResponse),
        (status = 403, description = "Invalid token", body = ErrorResponse)
    ),
    tag = "users"
)]
pub async fn fetch_all_users(
    State(state): State<AppState>,
    actor: AuthContext,
) -> Result<Json<UsersResponse>, ApiError> {
    debug!("Getting users for user {}", actor.id);

    let users: Vec<UserResponse> = state
        .user_service
        .get_all_users()
        .await
        .map_err(|e| {
            error!("Error fetching users: {}", e);
            ApiError::from(e)
        })?
        .into_iter()
        .map(UserResponse::from)
        .collect();

    Ok(Json(UsersResponse {
        message: "Successfully retrieved users".to_string(),
        count: users.len(),
        users,
    }))
}

/// Fetch one user
/// GET /api/users/{id}
#[utoipa::path(
    get,
    path = "/api/users/{id}",
    params(
        ("id" = i32, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "User found", body = UserEnvelope),
        (status = 400, description = "Invalid id", body = ErrorResponse),
        (status = 401, description = "No token cookie", body = ErrorResponse),
        (status = 403, description = "Invalid token", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    ),
    tag = "users"
)]
pub async fn fetch_user_by_id(
    State(state): State<AppState>,
    _actor: AuthContext,
    path: Result<Path<String>, PathRejection>,
) -> Result<Json<UserEnvelope>, ApiError> {
    let id = user_id_param(path)?;
    debug!("Getting user by id: {}", id);

    let user = state
        .user_service
        .get_user_by_id(id)
        .await
        .map_err(|e| match e {
            StoreError::NotFound => user_not_found(),
            other => {
                error!("Error fetching user: {}", other);
                other.into()
            }
        })?;

    Ok(Json(UserEnvelope {
        message: "User retrieved successfully".to_string(),
        user: user.into(),
    }))
}

/// Update a user. Users may edit themselves; only admins may edit others or change roles.
/// PUT /api/users/{id}
#[utoipa::path(
    put,
    path = "/api/users/{id}",
    params(
        ("id" = i32, Path, description = "User ID")
    ),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "User updated", body = UserEnvelope),
        (status = 400, description = "Invalid id or body", body = ErrorResponse),
        (status = 401, description = "No token cookie", body = ErrorResponse),
        (status = 403, description = "Invalid token or not permitted", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 409, description = "Email already exists", body = ErrorResponse)
    ),
    tag = "users"
)]
pub async fn update_user_by_id(
    State(state): State<AppState>,
    actor: AuthContext,
    path: Result<Path<String>, PathRejection>,
    payload: Result<Json<UpdateUserRequest>, JsonRejection>,
) -> Result<Json<UserEnvelope>, ApiError> {
    // Params are checked before the body
    let id = user_id_param(path)?;
    let request = json_body(payload)?.normalized();
    request.validate()?;

    info!("Updating user {} by user {}", id, actor.id);

    if let Err(denied) = policy::authorize_update(&actor, id, &request) {
        warn!("User {} denied update of user {}", actor.id, id);
        return Err(denied);
    }

    let user = state
        .user_service
        .update_user(id, request.into())
        .await
        .map_err(|e| match e {
            StoreError::NotFound => user_not_found(),
            StoreError::EmailTaken => ApiError::Conflict("Email already exists".to_string()),
            other => {
                error!("Error updating user: {}", other);
                other.into()
            }
        })?;

    info!("User {} updated", user.id);
    Ok(Json(UserEnvelope {
        message: "User updated successfully".to_string(),
        user: user.into(),
    }))
}

/// Delete a user. Users may delete themselves; admins may delete anyone.
/// DELETE /api/users/{id}
#[utoipa::path(
    delete,
    path = "/api/users/{id}",
    params(
        ("id" = i32, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "User deleted", body = UserEnvelope),
        (status = 400, description = "Invalid id", body = ErrorResponse),
        (status = 401, description = "No token cookie", body = ErrorResponse),
        (status = 403, description = "Invalid token or not permitted", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    ),
    tag = "users"
)]
pub async fn delete_user_by_id(
    State(state): State<AppState>,
    actor: AuthContext,
    path: Result<Path<String>, PathRejection>,
) -> Result<Json<UserEnvelope>, ApiError> {
    let id = user_id_param(path)?;

    info!("Deleting user {} by user {}", id, actor.id);

    if let Err(denied) = policy::authorize_delete(&actor, id) {
        warn!("User {} denied deletion of user {}", actor.id, id);
        return Err(denied);
    }

    let user = state
        .user_service
        .delete_user(id)
        .await
        .map_err(|e| match e {
            StoreError::NotFound => user_not_found(),
            other => {
                error!("Error deleting user: {}", other);
                other.into()
            }
        })?;

    info!("User {} deleted", user.id);
    Ok(Json(UserEnvelope {
        message: "User deleted successfully".to_string(),
        user: user.into(),
    }))
}
