use axum::extract::rejection::JsonRejection;
use axum::extract::FromRequest;

use crate::error::ScribeError;

/// JSON extractor whose rejections become [`ScribeError::Validation`] (400)
/// instead of axum's plain-text 415/422 responses.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(ScribeError))]
pub struct AppJson<T>(pub T);

impl From<JsonRejection> for ScribeError {
    fn from(rejection: JsonRejection) -> Self {
        map_json_rejection(rejection)
    }
}

fn map_json_rejection(rejection: JsonRejection) -> ScribeError {
    match rejection {
        JsonRejection::JsonDataError(err) => {
            let message = err.body_text();
            if let Some(field) = extract_missing_field(&message) {
                ScribeError::Validation(format!("Missing required field: {field}"))
            } else {
                ScribeError::Validation(format!("Invalid JSON: {message}"))
            }
        }
        JsonRejection::JsonSyntaxError(err) => {
            ScribeError::Validation(format!("JSON syntax error: {}", err.body_text()))
        }
        JsonRejection::MissingJsonContentType(_) => {
            ScribeError::Validation("Missing `Content-Type: application/json` header".to_string())
        }
        JsonRejection::BytesRejection(_) => {
            ScribeError::Validation("Failed to read request body".to_string())
        }
        _ => ScribeError::Validation(rejection.body_text()),
    }
}

fn extract_missing_field(message: &str) -> Option<&str> {
    let prefix = "missing field `";
    let start = message.find(prefix)? + prefix.len();
    let remaining = message.get(start..)?;
    let end = remaining.find('`')?;
    remaining.get(..end)
}
