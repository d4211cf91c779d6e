use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::api::state::AppState;

use super::handlers;
use super::openapi;

pub fn api_router(max_upload_bytes: usize) -> Router<AppState> {
    let uploads = Router::new()
        .route(
            "/upload-and-extract-content",
            post(handlers::ocr::upload_and_extract_content),
        )
        .layer(DefaultBodyLimit::max(max_upload_bytes));

    let users = Router::new()
        .route("/create-user", post(handlers::users::create_user))
        .route("/login", post(handlers::users::login));

    let public_routes = Router::new()
        .route("/health", get(handlers::health_check))
        .route("/openapi.json", get(openapi::openapi_json))
        .merge(openapi::redoc_router());

    Router::new()
        .merge(public_routes)
        .merge(uploads)
        .merge(users)
}
