use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::shared::validation::{not_blank, EMAIL_REGEX};

/// Request DTO for user registration
///
/// Missing fields deserialize as empty and fail validation.
#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct RegisterRequestDto {
    #[serde(default)]
    #[validate(
        custom(function = "not_blank", message = "Username is required"),
        length(max = 50, message = "Username must be at most 50 characters")
    )]
    #[schema(example = "alice")]
    pub username: String,

    #[serde(default)]
    #[validate(
        regex(path = *EMAIL_REGEX, message = "Invalid email format"),
        length(max = 255, message = "Email must be at most 255 characters")
    )]
    #[schema(example = "alice@x.com")]
    pub email: String,

    #[serde(default)]
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
}

/// Request DTO for user login
#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct LoginRequestDto {
    #[serde(default)]
    #[validate(custom(function = "not_blank", message = "Email is required"))]
    #[schema(example = "alice@x.com")]
    pub email: String,

    #[serde(default)]
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn register(username: &str, email: &str, password: &str) -> RegisterRequestDto {
        RegisterRequestDto {
            username: username.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    #[test]
    fn test_register_accepts_valid_input() {
        assert!(register("alice", "alice@x.com", "secret1").validate().is_ok());
    }

    #[test]
    fn test_register_rejects_bad_fields() {
        assert!(register("", "alice@x.com", "secret1").validate().is_err());
        assert!(register("   ", "alice@x.com", "secret1").validate().is_err());
        assert!(register(&"a".repeat(51), "alice@x.com", "secret1")
            .validate()
            .is_err());
        assert!(register("alice", "alice", "secret1").validate().is_err());
        assert!(register("alice", "alice@x.com", "12345").validate().is_err());
    }

    #[test]
    fn test_register_username_length_boundary() {
        assert!(register(&"a".repeat(50), "alice@x.com", "secret1")
            .validate()
            .is_ok());
    }

    #[test]
    fn test_register_email_length_boundary() {
        let local = "a".repeat(249);
        assert!(register("alice", &format!("{}@x.com", local), "secret1")
            .validate()
            .is_ok());

        let too_long = format!("{}a@x.com", local);
        let errors = register("alice", &too_long, "secret1")
            .validate()
            .unwrap_err();
        assert!(errors.field_errors().contains_key("email"));
    }

    #[test]
    fn test_missing_fields_fail_validation() {
        let dto: RegisterRequestDto = serde_json::from_str(r#"{"username":"alice"}"#).unwrap();
        let errors = dto.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("email"));
        assert!(fields.contains_key("password"));

        let dto: LoginRequestDto = serde_json::from_str("{}").unwrap();
        assert!(dto.validate().is_err());
    }
}
