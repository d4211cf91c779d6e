use axum::extract::State;
use validator::Validate;

use crate::api::dto::{CredentialsRequest, UserResponse};
use crate::api::extractors::AppJson;
use crate::api::response::ApiResponse;
use crate::api::state::AppState;
use crate::error::ScribeError;

/// `POST /create-user`
#[utoipa::path(
    post,
    path = "/create-user",
    tag = "users",
    operation_id = "users.create",
    request_body = CredentialsRequest,
    responses(
        (status = 201, description = "User created", body = UserResponse),
        (status = 400, description = "Malformed body or invalid username/password", body = crate::api::response::ErrorBody),
        (status = 409, description = "Username already exists", body = crate::api::response::ErrorBody),
        (status = 500, description = "Storage failure", body = crate::api::response::ErrorBody),
    )
)]
pub async fn create_user(
    State(state): State<AppState>,
    AppJson(req): AppJson<CredentialsRequest>,
) -> ApiResponse<UserResponse> {
    if let Err(e) = req.validate() {
        return ScribeError::from(e).into();
    }

    match state.users.create_user(req.into()).await {
        Ok(user) => ApiResponse::created(UserResponse::created(user.username)),
        Err(e) => e.into(),
    }
}

/// `POST /login`
///
/// Verifies the password only; no session or token is issued.
#[utoipa::path(
    post,
    path = "/login",
    tag = "users",
    operation_id = "users.login",
    request_body = CredentialsRequest,
    responses(
        (status = 200, description = "Credentials accepted", body = UserResponse),
        (status = 400, description = "Malformed body", body = crate::api::response::ErrorBody),
        (status = 401, description = "Wrong password", body = crate::api::response::ErrorBody),
        (status = 404, description = "Unknown username", body = crate::api::response::ErrorBody),
        (status = 500, description = "Storage failure", body = crate::api::response::ErrorBody),
    )
)]
pub async fn login(
    State(state): State<AppState>,
    AppJson(req): AppJson<CredentialsRequest>,
) -> ApiResponse<UserResponse> {
    match state.users.login(req.into()).await {
        Ok(user) => ApiResponse::success(UserResponse::logged_in(user.username)),
        Err(e) => e.into(),
    }
}
