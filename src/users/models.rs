use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::auth::Role;
use crate::validation::validate_update_has_changes;

/// User database model
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// User as returned by the API (no password hash)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    #[schema(example = 1)]
    pub id: i32,
    #[schema(example = "Ada Lovelace")]
    pub name: String,
    #[schema(example = "ada@example.com")]
    pub email: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            role: user.role,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// Input for account creation. `password` is plaintext; the service hashes it.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: Role,
}

/// Fields a repository update may change. `None` keeps the stored value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserChanges {
    pub name: Option<String>,
    pub email: Option<String>,
    pub role: Option<Role>,
}

/// Body of PUT /api/users/{id}
///
/// All fields are optional to support partial updates, but at least one must be present.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[validate(schema(function = "validate_update_has_changes"))]
pub struct UpdateUserRequest {
    #[validate(length(min = 2, max = 255, message = "Name must be between 2 and 255 characters"))]
    #[schema(example = "Ada King")]
    pub name: Option<String>,
    #[validate(
        email(message = "Invalid email address"),
        length(max = 255, message = "Email must be at most 255 characters")
    )]
    #[schema(example = "ada.king@example.com")]
    pub email: Option<String>,
    pub role: Option<Role>,
}

impl UpdateUserRequest {
    pub fn normalized(mut self) -> Self {
        self.name = self.name.map(|name| name.trim().to_string());
        self.email = self.email.map(|email| email.trim().to_lowercase());
        self
    }

    pub fn changes_role(&self) -> bool {
        self.role.is_some()
    }
}

impl From<UpdateUserRequest> for UserChanges {
    fn from(request: UpdateUserRequest) -> Self {
        Self {
            name: request.name,
            email: request.email,
            role: request.role,
        }
    }
}

/// GET /api/users response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UsersResponse {
    pub message: String,
    pub users: Vec<UserResponse>,
    pub count: usize,
}

/// Single-user response used by get, update and delete
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UserEnvelope {
    pub message: String,
    pub user: UserResponse,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_user() -> User {
        User {
            id: 1,
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            password_hash: "$argon2id$v=19$secret".to_string(),
            role: Role::Admin,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_user_response_never_contains_password() {
        let json = serde_json::to_value(UserResponse::from(sample_user())).unwrap();

        assert_eq!(json["id"], 1);
        assert_eq!(json["email"], "ada@example.com");
        assert_eq!(json["role"], "admin");
        assert!(json.get("password").is_none());
        assert!(json.get("password_hash").is_none());
        assert!(!json.to_string().contains("argon2"));
    }

    #[test]
    fn test_update_request_partial_fields() {
        let request: UpdateUserRequest =
            serde_json::from_str(r#"{"name": "  New Name  "}"#).unwrap();
        let request = request.normalized();

        assert_eq!(request.name.as_deref(), Some("New Name"));
        assert_eq!(request.email, None);
        assert!(!request.changes_role());
    }

    #[test]
    fn test_update_request_email_is_lowercased() {
        let request: UpdateUserRequest =
            serde_json::from_str(r#"{"email": " New@Example.COM "}"#).unwrap();
        assert_eq!(
            request.normalized().email.as_deref(),
            Some("new@example.com")
        );
    }

    #[test]
    fn test_update_request_into_changes() {
        let request: UpdateUserRequest =
            serde_json::from_str(r#"{"role": "admin", "name": "Ada"}"#).unwrap();
        let changes = UserChanges::from(request);

        assert_eq!(
            changes,
            UserChanges {
                name: Some("Ada".to_string()),
                email: None,
                role: Some(Role::Admin),
            }
        );
    }
}
