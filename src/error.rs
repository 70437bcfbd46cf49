// Error handling module for the User API
// Provides centralized error types and HTTP response conversion

use axum::{
    http::{header::InvalidHeaderValue, StatusCode},
    response::{IntoResponse, Json, Response},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, error, warn};
use utoipa::ToSchema;

use crate::auth::AuthError;
use crate::users::StoreError;
use crate::validation::FieldError;

/// Main error type for the API
/// All handlers return `Result<T, ApiError>`
///
/// Handlers map the store errors they expect to a specific variant; anything
/// else converts into [`ApiError::Internal`] through `From` and is answered
/// with an opaque 500.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Request body or path parameter failed validation
    /// Maps to HTTP 400 Bad Request
    #[error("Validation failed")]
    Validation(Vec<FieldError>),

    /// Bad credentials
    /// Maps to HTTP 401 Unauthorized
    #[error("{0}")]
    Unauthorized(String),

    /// Authenticated but not allowed to perform the action
    /// Maps to HTTP 403 Forbidden
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Maps to HTTP 404 Not Found
    #[error("{0}")]
    NotFound(String),

    /// Uniqueness violation
    /// Maps to HTTP 409 Conflict
    #[error("{0}")]
    Conflict(String),

    /// Anything unexpected. Details are logged, never sent to the client.
    /// Maps to HTTP 500 Internal Server Error
    #[error("Internal error: {0}")]
    Internal(String),
}

/// JSON body for every error response
///
/// `{ error, message?, details? }`
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<FieldError>>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: None,
            details: None,
        }
    }

    pub fn with_message(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: Some(message.into()),
            details: None,
        }
    }

    pub fn with_details(error: impl Into<String>, details: Vec<FieldError>) -> Self {
        Self {
            error: error.into(),
            message: None,
            details: Some(details),
        }
    }
}

impl ApiError {
    /// Shorthand for a single-field validation failure
    pub fn invalid_field(field: &str, message: &str) -> Self {
        ApiError::Validation(vec![FieldError::new(field, message)])
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn to_error_response(&self) -> ErrorResponse {
        match self {
            ApiError::Validation(details) => {
                debug!("Validation error: {:?}", details);
                ErrorResponse::with_details("Validation failed", details.clone())
            }
            ApiError::Unauthorized(message) => {
                warn!("Unauthorized: {}", message);
                ErrorResponse::new(message.clone())
            }
            ApiError::Forbidden(message) => {
                warn!("Forbidden access attempt: {}", message);
                ErrorResponse::with_message("Forbidden", message.clone())
            }
            ApiError::NotFound(message) => {
                debug!("Not found: {}", message);
                ErrorResponse::new(message.clone())
            }
            ApiError::Conflict(message) => {
                warn!("Conflict error: {}", message);
                ErrorResponse::new(message.clone())
            }
            ApiError::Internal(internal_msg) => {
                error!("Internal error: {}", internal_msg);
                ErrorResponse::new("Internal server error")
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = self.to_error_response();
        (self.status_code(), Json(body)).into_response()
    }
}

/// Store errors that reach here were not expected by the handler
impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        ApiError::Internal(err.to_string())
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        ApiError::Internal(err.to_string())
    }
}

impl From<InvalidHeaderValue> for ApiError {
    fn from(err: InvalidHeaderValue) -> Self {
        ApiError::Internal(format!("Invalid header value: {}", err))
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        ApiError::Validation(crate::validation::format_validation_errors(&errors))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body_of(err: ApiError) -> serde_json::Value {
        serde_json::to_value(err.to_error_response()).unwrap()
    }

    #[test]
    fn test_validation_response_shape() {
        let err = ApiError::invalid_field("id", "ID must be a positive integer");
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);

        let body = body_of(err);
        assert_eq!(body["error"], "Validation failed");
        assert_eq!(body["details"][0]["field"], "id");
        assert_eq!(body["details"][0]["message"], "ID must be a positive integer");
        assert!(body.get("message").is_none());
    }

    #[test]
    fn test_forbidden_response_shape() {
        let err = ApiError::Forbidden("You can only update your own profile".to_string());
        assert_eq!(err.status_code(), StatusCode::FORBIDDEN);

        let body = body_of(err);
        assert_eq!(body["error"], "Forbidden");
        assert_eq!(body["message"], "You can only update your own profile");
    }

    #[test]
    fn test_unexpected_store_error_is_opaque_500() {
        let err: ApiError = StoreError::NotFound.into();
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_of(err)["error"], "Internal server error");
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(ApiError::Unauthorized("x".into()).status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(ApiError::NotFound("x".into()).status_code(), StatusCode::NOT_FOUND);
        assert_eq!(ApiError::Conflict("x".into()).status_code(), StatusCode::CONFLICT);
    }
}
