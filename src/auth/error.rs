// Authentication and authorization error types

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;
use tracing::{error, warn};

use crate::error::ErrorResponse;

/// Errors raised by the token layer and the auth middleware
#[derive(Debug, Error)]
pub enum AuthError {
    /// No `token` cookie on a protected request
    #[error("Missing authentication token")]
    MissingToken,

    /// Bad signature, malformed payload or unexpected claims
    #[error("Invalid token")]
    InvalidToken,

    #[error("Token has expired")]
    ExpiredToken,

    /// Authenticated, but the route requires the admin role
    #[error("Admin access required")]
    AdminRequired,

    #[error("Token generation error: {0}")]
    TokenGenerationError(String),

    #[error("Password hashing error")]
    PasswordHashError,
}

impl AuthError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::MissingToken => StatusCode::UNAUTHORIZED,
            AuthError::InvalidToken => StatusCode::FORBIDDEN,
            AuthError::ExpiredToken => StatusCode::FORBIDDEN,
            AuthError::AdminRequired => StatusCode::FORBIDDEN,
            AuthError::TokenGenerationError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AuthError::PasswordHashError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Client-facing body. Expired and invalid tokens are indistinguishable
    /// to the caller.
    pub fn error_response(&self) -> ErrorResponse {
        match self {
            AuthError::MissingToken => {
                ErrorResponse::with_message("Authentication required", "No token provided")
            }
            AuthError::InvalidToken | AuthError::ExpiredToken => {
                ErrorResponse::with_message("Invalid token", "Token verification failed")
            }
            AuthError::AdminRequired => {
                ErrorResponse::with_message("Admin access required", "Insufficient permissions")
            }
            AuthError::TokenGenerationError(_) | AuthError::PasswordHashError => {
                ErrorResponse::new("Internal server error")
            }
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        match &self {
            AuthError::MissingToken => warn!("Missing token in request"),
            AuthError::InvalidToken => warn!("Invalid token attempt"),
            AuthError::ExpiredToken => warn!("Expired token attempt"),
            AuthError::AdminRequired => warn!("Non-admin request to admin route"),
            AuthError::TokenGenerationError(msg) => error!("Token generation error: {}", msg),
            AuthError::PasswordHashError => error!("Password hashing error"),
        }

        (self.status_code(), Json(self.error_response())).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_token_is_unauthorized() {
        let err = AuthError::MissingToken;
        assert_eq!(err.status_code(), StatusCode::UNAUTHORIZED);
        let body = serde_json::to_value(err.error_response()).unwrap();
        assert_eq!(body["error"], "Authentication required");
        assert_eq!(body["message"], "No token provided");
    }

    #[test]
    fn test_expired_and_invalid_tokens_share_a_response() {
        let expired = serde_json::to_value(AuthError::ExpiredToken.error_response()).unwrap();
        let invalid = serde_json::to_value(AuthError::InvalidToken.error_response()).unwrap();
        assert_eq!(expired, invalid);
        assert_eq!(AuthError::ExpiredToken.status_code(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn test_internal_errors_are_opaque() {
        let body = serde_json::to_value(
            AuthError::TokenGenerationError("key rejected".to_string()).error_response(),
        )
        .unwrap();
        assert_eq!(body["error"], "Internal server error");
        assert!(body.get("message").is_none());
    }
}
