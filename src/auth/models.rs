// Authentication data models and DTOs

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::users::models::UserResponse;

/// Account role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "text", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }
}

impl Default for Role {
    fn default() -> Self {
        Role::User
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Signup request DTO
///
/// Missing string fields deserialize as empty so they surface as
/// field-level validation errors instead of a body parse failure.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct SignupRequest {
    #[serde(default)]
    #[validate(length(min = 2, max = 255, message = "Name must be between 2 and 255 characters"))]
    #[schema(example = "Ada Lovelace")]
    pub name: String,
    #[serde(default)]
    #[validate(
        email(message = "Invalid email address"),
        length(max = 255, message = "Email must be at most 255 characters")
    )]
    #[schema(example = "ada@example.com")]
    pub email: String,
    #[serde(default)]
    #[validate(length(min = 6, max = 128, message = "Password must be between 6 and 128 characters"))]
    #[schema(example = "correct horse")]
    pub password: String,
    #[serde(default)]
    pub role: Role,
}

impl SignupRequest {
    /// Trim the name and trim/lowercase the email before validation
    pub fn normalized(mut self) -> Self {
        self.name = self.name.trim().to_string();
        self.email = self.email.trim().to_lowercase();
        self
    }
}

/// Signin request DTO
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct SigninRequest {
    #[serde(default)]
    #[validate(email(message = "Invalid email address"))]
    #[schema(example = "ada@example.com")]
    pub email: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

impl SigninRequest {
    pub fn normalized(mut self) -> Self {
        self.email = self.email.trim().to_lowercase();
        self
    }
}

/// Signup / signin response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AuthResponse {
    pub message: String,
    pub user: UserResponse,
}

/// Plain acknowledgement body
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Role::Admin).unwrap(), "\"admin\"");
        assert_eq!(serde_json::to_string(&Role::User).unwrap(), "\"user\"");
    }

    #[test]
    fn test_unknown_role_is_rejected() {
        let result: Result<Role, _> = serde_json::from_str("\"superuser\"");
        assert!(result.is_err());
    }

    #[test]
    fn test_signup_defaults_role_to_user() {
        let request: SignupRequest = serde_json::from_str(
            r#"{"name": "Ada", "email": "ada@example.com", "password": "secret1"}"#,
        )
        .unwrap();
        assert_eq!(request.role, Role::User);
    }

    #[test]
    fn test_signup_normalization() {
        let request: SignupRequest = serde_json::from_str(
            r#"{"name": "  Ada  ", "email": "  ADA@Example.COM ", "password": "secret1"}"#,
        )
        .unwrap();
        let request = request.normalized();
        assert_eq!(request.name, "Ada");
        assert_eq!(request.email, "ada@example.com");
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_signup_missing_fields_fail_validation() {
        let request: SignupRequest = serde_json::from_str("{}").unwrap();
        let errors = request.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("name"));
        assert!(fields.contains_key("email"));
        assert!(fields.contains_key("password"));
    }

    #[test]
    fn test_signin_requires_password() {
        let request: SigninRequest =
            serde_json::from_str(r#"{"email": "ada@example.com"}"#).unwrap();
        let errors = request.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("password"));
    }
}
