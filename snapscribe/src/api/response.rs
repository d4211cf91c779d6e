//! # Response Contract
//!
//! Success bodies are the payload itself, serialized at the top level of the
//! JSON document (e.g. `{ "extracted_content": "...", "words": [...] }`).
//! Error bodies always have the same shape:
//!
//! ```json
//! { "error": { "code": "conflict", "message": "Username 'alice' already exists" } }
//! ```
//!
//! The HTTP status is carried alongside the payload and never serialized.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::error::ScribeError;

/// Machine-readable error code included in every error response.
///
/// Serialized as a snake_case string on the wire (e.g. `"invalid_request"`).
/// Each variant maps to a fixed HTTP status code via [`ErrorCode::status`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// Malformed input or failed validation. HTTP 400.
    InvalidRequest,
    /// Credentials did not match. HTTP 401.
    Unauthorized,
    /// The requested resource does not exist. HTTP 404.
    NotFound,
    /// The request conflicts with existing state. HTTP 409.
    Conflict,
    /// Unexpected server-side failure. Details are never leaked. HTTP 500.
    InternalError,
}

impl ErrorCode {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::InvalidRequest => StatusCode::BAD_REQUEST,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Conflict => StatusCode::CONFLICT,
            Self::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidRequest => write!(f, "invalid_request"),
            Self::Unauthorized => write!(f, "unauthorized"),
            Self::NotFound => write!(f, "not_found"),
            Self::Conflict => write!(f, "conflict"),
            Self::InternalError => write!(f, "internal_error"),
        }
    }
}

/// Structured error payload.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ApiError {
    /// Machine-readable error classification.
    pub code: ErrorCode,
    /// Human-readable description, safe to show to end users.
    pub message: String,
}

/// Wire shape of every error response.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ErrorBody {
    pub error: ApiError,
}

/// Handler return type: either a payload with a success status or an error.
#[derive(Debug, Clone)]
pub struct ApiResponse<T: Serialize> {
    pub data: Option<T>,
    pub error: Option<ApiError>,
    status: StatusCode,
}

impl<T: Serialize> ApiResponse<T> {
    /// HTTP 200 with `data` as the body.
    pub fn success(data: T) -> Self {
        Self {
            data: Some(data),
            error: None,
            status: StatusCode::OK,
        }
    }

    /// HTTP 201 with `data` as the body.
    pub fn created(data: T) -> Self {
        Self {
            data: Some(data),
            error: None,
            status: StatusCode::CREATED,
        }
    }

    /// Error response. HTTP status is derived from the [`ErrorCode`].
    pub fn error(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            data: None,
            error: Some(ApiError {
                code,
                message: message.into(),
            }),
            status: code.status(),
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        let status = self.status;
        let body = match (self.data, self.error) {
            (_, Some(error)) => serde_json::to_value(ErrorBody { error }),
            (Some(data), None) => serde_json::to_value(data),
            (None, None) => Ok(serde_json::Value::Null),
        };

        match body {
            Ok(body) => (status, Json(body)).into_response(),
            Err(e) => {
                tracing::error!(error = %e, "Failed to serialize response body");
                let body = serde_json::json!({
                    "error": {
                        "code": "internal_error",
                        "message": "An internal error occurred"
                    }
                });
                (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
            }
        }
    }
}

impl<T: Serialize> From<ScribeError> for ApiResponse<T> {
    /// Internal error details are never leaked to the client: the real error
    /// is logged and a generic message is returned.
    fn from(err: ScribeError) -> Self {
        let code = err.code();
        match err {
            ScribeError::NotFound(msg)
            | ScribeError::Validation(msg)
            | ScribeError::Conflict(msg) => ApiResponse::error(code, msg),

            ScribeError::InvalidCredentials => {
                ApiResponse::error(code, "Invalid username or password")
            }

            ScribeError::Json(e) => ApiResponse::error(code, format!("Invalid JSON: {e}")),

            internal @ (ScribeError::Database(_)
            | ScribeError::Http(_)
            | ScribeError::Io(_)
            | ScribeError::PasswordHash(_)
            | ScribeError::Internal(_)
            | ScribeError::Ocr(_)
            | ScribeError::OcrUnavailable(_)) => {
                tracing::error!(error = %internal, "Internal error mapped to response");
                ApiResponse::error(ErrorCode::InternalError, "An internal error occurred")
            }
        }
    }
}
