use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::api::response::{ApiResponse, ErrorCode};

#[derive(Error, Debug)]
pub enum ScribeError {
    #[error("Database error: {0}")]
    Database(#[from] libsql::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Password hashing error: {0}")]
    PasswordHash(String),

    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("OCR error: {0}")]
    Ocr(String),

    #[error("OCR unavailable: {0}")]
    OcrUnavailable(String),
}

impl ScribeError {
    /// The HTTP status this error surfaces as.
    pub fn status(&self) -> StatusCode {
        self.code().status()
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            ScribeError::NotFound(_) => ErrorCode::NotFound,
            ScribeError::Validation(_) | ScribeError::Json(_) => ErrorCode::InvalidRequest,
            ScribeError::Conflict(_) => ErrorCode::Conflict,
            ScribeError::InvalidCredentials => ErrorCode::Unauthorized,
            ScribeError::Database(_)
            | ScribeError::Http(_)
            | ScribeError::Io(_)
            | ScribeError::PasswordHash(_)
            | ScribeError::Internal(_)
            | ScribeError::Ocr(_)
            | ScribeError::OcrUnavailable(_) => ErrorCode::InternalError,
        }
    }
}

impl From<validator::ValidationErrors> for ScribeError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
        fields.sort_by(|a, b| a.0.cmp(&b.0));

        let message = fields
            .into_iter()
            .filter_map(|(field, errs)| {
                errs.first().map(|err| match &err.message {
                    Some(msg) => msg.to_string(),
                    None => format!("{field} is invalid ({})", err.code),
                })
            })
            .collect::<Vec<_>>()
            .join("; ");

        ScribeError::Validation(message)
    }
}

impl IntoResponse for ScribeError {
    fn into_response(self) -> Response {
        ApiResponse::<()>::from(self).into_response()
    }
}

pub type Result<T> = std::result::Result<T, ScribeError>;
