pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod users;
pub mod validation;

use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::State,
    http::StatusCode,
    middleware,
    response::Json,
    routing::{get, post},
    Router,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tower_http::trace::TraceLayer;
use utoipa::{OpenApi, ToSchema};
use utoipa_swagger_ui::SwaggerUi;

use auth::{CookieConfig, TokenService};
use error::ErrorResponse;
use users::UserService;

/// OpenAPI documentation structure
#[derive(OpenApi)]
#[openapi(
    paths(
        auth::handlers::signup,
        auth::handlers::signin,
        auth::handlers::signout,
        users::handlers::fetch_all_users,
        users::handlers::fetch_user_by_id,
        users::handlers::update_user_by_id,
        users::handlers::delete_user_by_id,
        health,
    ),
    components(
        schemas(
            auth::Role,
            auth::SignupRequest,
            auth::SigninRequest,
            auth::AuthResponse,
            auth::MessageResponse,
            users::UserResponse,
            users::UpdateUserRequest,
            users::models::UsersResponse,
            users::models::UserEnvelope,
            ErrorResponse,
            validation::FieldError,
            HealthResponse,
        )
    ),
    tags(
        (name = "auth", description = "Signup, signin and signout"),
        (name = "users", description = "User management; requires the token cookie"),
        (name = "health", description = "Liveness")
    ),
    info(
        title = "User API",
        version = "1.0.0",
        description = "Cookie-authenticated user accounts with role-based access"
    )
)]
pub struct ApiDoc;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub user_service: Arc<UserService>,
    pub token_service: Arc<TokenService>,
    pub cookies: CookieConfig,
    pub started_at: Instant,
}

impl AppState {
    pub fn new(
        user_service: UserService,
        token_service: TokenService,
        cookies: CookieConfig,
    ) -> Self {
        Self {
            user_service: Arc::new(user_service),
            token_service: Arc::new(token_service),
            cookies,
            started_at: Instant::now(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    #[schema(example = "OK")]
    pub status: String,
    pub timestamp: String,
    /// Seconds since the process started serving
    pub uptime: f64,
}

/// Liveness probe
/// GET /health
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is up", body = HealthResponse)
    ),
    tag = "health"
)]
async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "OK".to_string(),
        timestamp: Utc::now().to_rfc3339(),
        uptime: state.started_at.elapsed().as_secs_f64(),
    })
}

async fn root() -> &'static str {
    "Hello from the User API!"
}

async fn api_root() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "message": "User API is running!" }))
}

async fn route_not_found() -> (StatusCode, Json<ErrorResponse>) {
    (StatusCode::NOT_FOUND, Json(ErrorResponse::new("Route not found")))
}

/// Routes under /api/auth. Public.
fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/signup", post(auth::signup))
        .route("/signin", post(auth::signin))
        .route("/signout", post(auth::signout))
}

/// Routes under /api/users. Every route requires a valid token cookie.
fn user_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(users::fetch_all_users))
        .route(
            "/:id",
            get(users::fetch_user_by_id)
                .put(users::update_user_by_id)
                .delete(users::delete_user_by_id),
        )
        .route_layer(middleware::from_fn_with_state(
            state.token_service.clone(),
            auth::authenticate_token,
        ))
}

/// Creates and configures the application router.
/// The caller layers CORS on top.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/", get(root))
        .route("/health", get(health))
        .route("/api", get(api_root))
        .nest("/api/auth", auth_routes())
        .nest("/api/users", user_routes(&state))
        .fallback(route_not_found)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
