// Authentication middleware for protected routes

use std::sync::Arc;

use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};
use tracing::{debug, warn};

use crate::auth::{
    cookie::{self, TOKEN_COOKIE},
    error::AuthError,
    models::Role,
    token::TokenService,
};

/// Identity of the caller, derived from a verified token. Lives for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthContext {
    pub id: i32,
    pub email: String,
    pub role: Role,
}

impl AuthContext {
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }

    /// True when the caller is the user with `user_id`
    pub fn is_user(&self, user_id: i32) -> bool {
        self.id == user_id
    }
}

/// Handlers behind [`authenticate_token`] take the context as an extractor.
/// Without the middleware in front there is no context and the request is
/// treated as unauthenticated.
#[async_trait]
impl<S> FromRequestParts<S> for AuthContext
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthContext>()
            .cloned()
            .ok_or(AuthError::MissingToken)
    }
}

/// Reads the `token` cookie, verifies it and attaches the [`AuthContext`].
///
/// - no cookie: 401 Authentication required
/// - verification fails: 403 Invalid token
pub async fn authenticate_token(
    State(tokens): State<Arc<TokenService>>,
    mut request: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let endpoint = request.uri().path().to_string();

    let token = cookie::read(request.headers(), TOKEN_COOKIE).ok_or_else(|| {
        warn!("No token cookie on request to protected endpoint: {}", endpoint);
        AuthError::MissingToken
    })?;

    let claims = tokens.verify(&token).map_err(|e| {
        warn!("Authentication error for endpoint {}: {}", endpoint, e);
        e
    })?;

    debug!(
        "Authenticated user_id={}, role={}, endpoint={}",
        claims.id, claims.role, endpoint
    );
    request.extensions_mut().insert(claims.identity());

    Ok(next.run(request).await)
}

/// Second gate for admin-only routes. Must sit behind [`authenticate_token`].
pub async fn require_admin(request: Request, next: Next) -> Result<Response, AuthError> {
    match request.extensions().get::<AuthContext>() {
        Some(ctx) if ctx.is_admin() => Ok(next.run(request).await),
        Some(ctx) => {
            warn!(
                "Authorization failed: user_id={}, role={}, endpoint={}",
                ctx.id,
                ctx.role,
                request.uri().path()
            );
            Err(AuthError::AdminRequired)
        }
        None => Err(AuthError::AdminRequired),
    }
}
