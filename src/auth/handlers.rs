// HTTP handlers for authentication endpoints

use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use tracing::{error, info, warn};
use validator::Validate;

use crate::auth::{
    cookie::TOKEN_COOKIE,
    models::{AuthResponse, MessageResponse, SigninRequest, SignupRequest},
};
use crate::error::ApiError;
use crate::users::{NewUser, StoreError, User};
use crate::validation::json_body;
use crate::AppState;

/// Sign a token for `user` and build the `Set-Cookie` header carrying it
fn session_cookie(
    state: &AppState,
    user: &User,
) -> Result<[(header::HeaderName, header::HeaderValue); 1], ApiError> {
    let token = state.token_service.sign(user.id, &user.email, user.role)?;
    let cookie = state.cookies.set(TOKEN_COOKIE, &token)?;
    Ok([(header::SET_COOKIE, cookie)])
}

/// Register a new user and start a session
/// POST /api/auth/signup
#[utoipa::path(
    post,
    path = "/api/auth/signup",
    request_body = SignupRequest,
    responses(
        (status = 201, description = "User registered; token cookie set", body = AuthResponse),
        (status = 400, description = "Validation failed", body = ErrorResponse),
        (status = 409, description = "Email already exists", body = ErrorResponse)
    ),
    tag = "auth"
)]
pub async fn signup(
    State(state): State<AppState>,
    payload: Result<Json<SignupRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let request = json_body(payload)?.normalized();
    request.validate()?;

    let user = state
        .user_service
        .create_user(NewUser {
            name: request.name,
            email: request.email,
            password: request.password,
            role: request.role,
        })
        .await
        .map_err(|e| match e {
            StoreError::EmailTaken => ApiError::Conflict("Email already exists".to_string()),
            other => {
                error!("Signup error: {}", other);
                other.into()
            }
        })?;

    let cookie = session_cookie(&state, &user)?;

    info!("User registered successfully: {}", user.email);
    Ok((
        StatusCode::CREATED,
        cookie,
        Json(AuthResponse {
            message: "User registered".to_string(),
            user: user.into(),
        }),
    ))
}

/// Authenticate and start a session
/// POST /api/auth/signin
#[utoipa::path(
    post,
    path = "/api/auth/signin",
    request_body = SigninRequest,
    responses(
        (status = 200, description = "Signed in; token cookie set", body = AuthResponse),
        (status = 400, description = "Validation failed", body = ErrorResponse),
        (status = 401, description = "Invalid credentials", body = ErrorResponse)
    ),
    tag = "auth"
)]
pub async fn signin(
    State(state): State<AppState>,
    payload: Result<Json<SigninRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let request = json_body(payload)?.normalized();
    request.validate()?;

    let user = state
        .user_service
        .authenticate_user(&request.email, &request.password)
        .await
        .map_err(|e| match e {
            // Same answer for both so callers cannot probe for registered emails
            StoreError::UnknownEmail | StoreError::InvalidPassword => {
                warn!("Failed signin attempt");
                ApiError::Unauthorized("Invalid credentials".to_string())
            }
            other => {
                error!("Signin error: {}", other);
                other.into()
            }
        })?;

    let cookie = session_cookie(&state, &user)?;

    info!("User signed in successfully: {}", user.email);
    Ok((
        StatusCode::OK,
        cookie,
        Json(AuthResponse {
            message: "User signed in successfully".to_string(),
            user: user.into(),
        }),
    ))
}

/// Clear the token cookie. Stateless: no token is required or checked.
/// POST /api/auth/signout
#[utoipa::path(
    post,
    path = "/api/auth/signout",
    responses(
        (status = 200, description = "Signed out; token cookie cleared", body = MessageResponse)
    ),
    tag = "auth"
)]
pub async fn signout(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let cookie = state.cookies.clear(TOKEN_COOKIE)?;

    info!("User signed out successfully");
    Ok((
        StatusCode::OK,
        [(header::SET_COOKIE, cookie)],
        Json(MessageResponse {
            message: "User signed out successfully".to_string(),
        }),
    ))
}
