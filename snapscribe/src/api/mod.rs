pub mod dto;
pub(crate) mod extractors;
pub mod handlers;
pub mod openapi;
pub mod response;
mod router;
mod routes;
mod state;

pub use routes::create_router;
pub use state::AppState;

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    use crate::api::routes::create_router;
    use crate::api::state::AppState;
    use crate::config::{Config, DatabaseConfig, LogFormat, OcrConfig, ServerConfig};

    async fn test_state() -> AppState {
        let config = Config {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 3000,
                max_upload_bytes: 64 * 1024,
                log_format: LogFormat::Pretty,
            },
            database: DatabaseConfig {
                url: ":memory:".to_string(),
                auth_token: None,
                local_path: None,
                busy_timeout_ms: 1000,
            },
            ocr: OcrConfig {
                model: "unconfigured".to_string(),
                ..OcrConfig::default()
            },
        };

        let raw_db = crate::db::Database::new(&config.database).await.unwrap();
        let db_backend = crate::db::LibSqlBackend::new(raw_db);
        let db: std::sync::Arc<dyn crate::db::DatabaseBackend> = std::sync::Arc::new(db_backend);
        let ocr = crate::ocr::OcrProvider::new(&config.ocr).unwrap();

        AppState::new(config, db, ocr)
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn json_post(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn create_user_returns_created() {
        let app = create_router(test_state().await);

        let response = app
            .oneshot(json_post(
                "/create-user",
                r#"{"username":"alice","password":"pw"}"#,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        let json = body_json(response).await;
        assert_eq!(json["username"], "alice");
        assert_eq!(json["message"], "User created successfully");
    }

    #[tokio::test]
    async fn login_unknown_user_is_not_found() {
        let app = create_router(test_state().await);

        let response = app
            .oneshot(json_post("/login", r#"{"username":"ghost","password":"pw"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let json = body_json(response).await;
        assert_eq!(json["error"]["code"], "not_found");
    }

    #[tokio::test]
    async fn upload_without_image_is_bad_request() {
        let app = create_router(test_state().await);

        let boundary = "X-SNAPSCRIBE-BOUNDARY";
        let body = format!(
            "--{boundary}\r\nContent-Disposition: form-data; name=\"language\"\r\n\r\neng\r\n--{boundary}--\r\n"
        );
        let request = Request::builder()
            .method("POST")
            .uri("/upload-and-extract-content")
            .header(
                "content-type",
                format!("multipart/form-data; boundary={boundary}"),
            )
            .body(Body::from(body))
            .unwrap();

        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["error"]["message"], "Missing required field: image");
    }

    #[tokio::test]
    async fn health_reports_unavailable_ocr() {
        let app = create_router(test_state().await);

        let response = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["database"]["status"], "ok");
        assert_eq!(json["ocr"]["status"], "unavailable");
        assert_eq!(json["ocr"]["engine"], "unavailable");
    }
}
