use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::models::Credentials;

/// Body of `POST /create-user` and `POST /login`.
#[derive(Clone, Deserialize, Validate, utoipa::ToSchema)]
pub struct CredentialsRequest {
    /// 1 to 64 characters, no whitespace or control characters.
    #[validate(
        length(min = 1, max = 64, message = "username must be 1 to 64 characters"),
        custom(function = "validate_username")
    )]
    pub username: String,
    /// 1 to 1024 characters.
    #[validate(length(min = 1, max = 1024, message = "password must be 1 to 1024 characters"))]
    pub password: String,
}

impl std::fmt::Debug for CredentialsRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialsRequest")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

fn validate_username(username: &str) -> Result<(), ValidationError> {
    if username
        .chars()
        .any(|c| c.is_whitespace() || c.is_control())
    {
        let mut err = ValidationError::new("username_charset");
        err.message = Some("username must not contain whitespace or control characters".into());
        return Err(err);
    }
    Ok(())
}

impl From<CredentialsRequest> for Credentials {
    fn from(req: CredentialsRequest) -> Self {
        Credentials {
            username: req.username,
            password: req.password,
        }
    }
}

/// Confirmation returned by `POST /create-user` and `POST /login`.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct UserResponse {
    pub username: String,
    pub message: String,
}

impl UserResponse {
    pub fn created(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            message: "User created successfully".to_string(),
        }
    }

    pub fn logged_in(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            message: "Login successful".to_string(),
        }
    }
}
