use axum::Json;
use utoipa::OpenApi;
use utoipa_redoc::{Redoc, Servable};

use super::dto;
use super::handlers;
use super::response;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Snapscribe API",
        version = "0.1.0",
        description = "Extract text, words and integers from images, with a minimal user store.",
    ),
    paths(
        handlers::health::health_check,
        handlers::ocr::upload_and_extract_content,
        handlers::users::create_user,
        handlers::users::login,
    ),
    components(schemas(
        response::ErrorCode,
        response::ApiError,
        response::ErrorBody,
        dto::UploadForm,
        dto::ExtractContentResponse,
        dto::CredentialsRequest,
        dto::UserResponse,
        handlers::health::HealthData,
        handlers::health::DatabaseStatus,
        handlers::health::OcrStatus,
    )),
    tags(
        (name = "health", description = "Health check"),
        (name = "ocr", description = "Image text extraction"),
        (name = "users", description = "Account creation and password login"),
    ),
)]
pub struct ApiDoc;

pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

pub fn redoc_router<S: Clone + Send + Sync + 'static>() -> axum::Router<S> {
    Redoc::with_url("/docs", ApiDoc::openapi()).into()
}
