use axum::extract::State;
use serde::Serialize;

use crate::api::response::ApiResponse;
use crate::api::state::AppState;

#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct HealthData {
    pub status: String,
    pub version: String,
    pub database: DatabaseStatus,
    pub ocr: OcrStatus,
}

#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct DatabaseStatus {
    pub status: String,
    /// Registered accounts; omitted when the database is unreachable.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub users: Option<u64>,
}

#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct OcrStatus {
    pub status: String,
    pub engine: String,
}

/// `GET /health`
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "Service health status", body = HealthData),
    )
)]
pub async fn health_check(State(state): State<AppState>) -> ApiResponse<HealthData> {
    let db_status = match state.db.ping().await {
        Ok(_) => {
            let users = match state.db.count_users().await {
                Ok(count) => Some(count),
                Err(e) => {
                    tracing::warn!(error = %e, "Failed to count users");
                    None
                }
            };
            DatabaseStatus {
                status: "ok".to_string(),
                users,
            }
        }
        Err(e) => {
            tracing::warn!(error = %e, "Database health check failed");
            DatabaseStatus {
                status: "error".to_string(),
                users: None,
            }
        }
    };

    let ocr = state.extraction.ocr();
    let ocr_status = OcrStatus {
        status: if ocr.is_available() {
            "available".to_string()
        } else {
            "unavailable".to_string()
        },
        engine: ocr.engine_name().to_string(),
    };

    ApiResponse::success(HealthData {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        database: db_status,
        ocr: ocr_status,
    })
}
