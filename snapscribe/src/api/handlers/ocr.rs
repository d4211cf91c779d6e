use axum::extract::multipart::MultipartRejection;
use axum::extract::{Multipart, State};

use crate::api::dto::ExtractContentResponse;
use crate::api::response::{ApiResponse, ErrorCode};
use crate::api::state::AppState;

/// Parts pulled out of the upload form.
#[derive(Default)]
struct UploadParts {
    image: Option<Vec<u8>>,
    api_key: Option<String>,
    language: Option<String>,
}

/// `POST /upload-and-extract-content`
///
/// Accepts a multipart form with an `image` file plus optional `api_key` and
/// `language` text fields. Unknown fields are ignored.
#[utoipa::path(
    post,
    path = "/upload-and-extract-content",
    tag = "ocr",
    operation_id = "ocr.extract",
    request_body(content_type = "multipart/form-data", content = crate::api::dto::UploadForm),
    responses(
        (status = 200, description = "Text extracted from the image", body = ExtractContentResponse),
        (status = 400, description = "Missing or invalid image, or unsupported language", body = crate::api::response::ErrorBody),
        (status = 500, description = "OCR engine failure", body = crate::api::response::ErrorBody),
    )
)]
pub async fn upload_and_extract_content(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> ApiResponse<ExtractContentResponse> {
    let multipart = match multipart {
        Ok(m) => m,
        Err(rejection) => {
            return ApiResponse::error(
                ErrorCode::InvalidRequest,
                format!("Expected a multipart/form-data body: {}", rejection.body_text()),
            );
        }
    };

    let parts = match read_parts(multipart).await {
        Ok(parts) => parts,
        Err(message) => return ApiResponse::error(ErrorCode::InvalidRequest, message),
    };

    let Some(image) = parts.image else {
        return ApiResponse::error(ErrorCode::InvalidRequest, "Missing required field: image");
    };

    match state
        .extraction
        .extract(image, parts.language.as_deref(), parts.api_key.as_deref())
        .await
    {
        Ok(result) => ApiResponse::success(result.into()),
        Err(e) => e.into(),
    }
}

async fn read_parts(mut multipart: Multipart) -> Result<UploadParts, String> {
    let mut parts = UploadParts::default();

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => return Err(format!("Malformed multipart body: {}", e.body_text())),
        };

        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            "image" => {
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| format!("Failed to read image: {}", e.body_text()))?;
                parts.image = Some(bytes.to_vec());
            }
            "api_key" => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| format!("Invalid api_key: {}", e.body_text()))?;
                parts.api_key = Some(value).filter(|v| !v.trim().is_empty());
            }
            "language" => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| format!("Invalid language: {}", e.body_text()))?;
                parts.language = Some(value);
            }
            other => {
                tracing::debug!(field = other, "Ignoring unknown upload field");
            }
        }
    }

    Ok(parts)
}
