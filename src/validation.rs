// Validation utilities module
// Converts validator output into the uniform `[{field, message}]` detail list
// and holds the custom rules the derive attributes refer to.

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path,
    },
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{ValidationError, ValidationErrors};

use crate::error::ApiError;
use crate::users::models::UpdateUserRequest;

/// One failed rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Flatten `ValidationErrors` into field-level details, sorted by field.
/// Struct-level errors (`__all__`) are reported under `body`.
pub fn format_validation_errors(errors: &ValidationErrors) -> Vec<FieldError> {
    let mut details: Vec<FieldError> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, field_errors)| {
            let field = if field == "__all__" { "body" } else { field };
            field_errors.iter().map(move |err| {
                let message = err
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("Invalid value ({})", err.code));
                FieldError::new(field, message)
            })
        })
        .collect();

    details.sort_by(|a, b| a.field.cmp(&b.field));
    details
}

/// Unwrap a JSON body, turning extractor rejections (bad JSON, wrong types,
/// unknown enum values, missing content type) into validation errors.
pub fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    payload
        .map(|Json(value)| value)
        .map_err(|rejection| ApiError::invalid_field("body", &rejection.body_text()))
}

/// Parse the `:id` path segment. Ids are positive integers.
pub fn parse_user_id(raw: &str) -> Result<i32, ApiError> {
    match raw.trim().parse::<i64>() {
        Ok(id) if id > 0 && id <= i32::MAX as i64 => Ok(id as i32),
        Ok(_) => Err(ApiError::invalid_field("id", "ID must be a positive integer")),
        Err(_) => Err(ApiError::invalid_field("id", "ID must be a valid number")),
    }
}

/// Extract and parse the `:id` path segment. Segments axum cannot decode
/// (for example invalid UTF-8) get the same `id` field error as bad numbers.
pub fn user_id_param(path: Result<Path<String>, PathRejection>) -> Result<i32, ApiError> {
    match path {
        Ok(Path(raw)) => parse_user_id(&raw),
        Err(rejection) => {
            tracing::debug!("Rejected id path segment: {}", rejection.body_text());
            Err(ApiError::invalid_field("id", "ID must be a valid number"))
        }
    }
}

/// An update must change at least one field
pub fn validate_update_has_changes(request: &UpdateUserRequest) -> Result<(), ValidationError> {
    if request.name.is_none() && request.email.is_none() && request.role.is_none() {
        let mut err = ValidationError::new("empty_update");
        err.message = Some("At least one field must be provided for update".into());
        Err(err)
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::Role;
    use validator::Validate;

    #[test]
    fn test_parse_user_id() {
        assert_eq!(parse_user_id("1").unwrap(), 1);
        assert_eq!(parse_user_id("2147483647").unwrap(), i32::MAX);
        assert!(parse_user_id("0").is_err());
        assert!(parse_user_id("-3").is_err());
        assert!(parse_user_id("abc").is_err());
        assert!(parse_user_id("1.5").is_err());
        assert!(parse_user_id("2147483648").is_err());
    }

    #[test]
    fn test_user_id_param_parses_extracted_segment() {
        assert_eq!(user_id_param(Ok(Path("7".to_string()))).unwrap(), 7);
        assert!(matches!(
            user_id_param(Ok(Path("seven".to_string()))),
            Err(ApiError::Validation(_))
        ));
    }

    #[test]
    fn test_parse_user_id_reports_id_field() {
        match parse_user_id("abc") {
            Err(ApiError::Validation(details)) => {
                assert_eq!(details.len(), 1);
                assert_eq!(details[0].field, "id");
            }
            other => panic!("Expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_update_is_rejected_under_body() {
        let request = UpdateUserRequest::default();
        let errors = request.validate().unwrap_err();
        let details = format_validation_errors(&errors);

        assert_eq!(
            details,
            vec![FieldError::new(
                "body",
                "At least one field must be provided for update"
            )]
        );
    }

    #[test]
    fn test_role_only_update_passes_schema_check() {
        let request = UpdateUserRequest {
            role: Some(Role::Admin),
            ..UpdateUserRequest::default()
        };
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_details_are_sorted_by_field() {
        let request = UpdateUserRequest {
            name: Some("x".to_string()),
            email: Some("not-an-email".to_string()),
            role: None,
        };
        let details = format_validation_errors(&request.validate().unwrap_err());

        let fields: Vec<&str> = details.iter().map(|d| d.field.as_str()).collect();
        assert_eq!(fields, vec!["email", "name"]);
    }
}
