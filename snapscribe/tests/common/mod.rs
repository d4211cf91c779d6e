// Shared helpers for the HTTP integration tests.
#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::{Arc, Once};

use serde_json::json;
use tempfile::TempDir;
use wiremock::MockServer;

use snapscribe::api::{create_router, AppState};
use snapscribe::config::{Config, DatabaseConfig, OcrConfig};
use snapscribe::db::{Database, DatabaseBackend, LibSqlBackend};
use snapscribe::ocr::OcrProvider;

static INIT: Once = Once::new();

/// Initialize tracing subscriber once for tests
pub fn init_test_logger() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .try_init();
    });
}

/// A running server plus everything that must outlive it.
pub struct TestApp {
    pub addr: SocketAddr,
    pub client: reqwest::Client,
    pub ocr_mock: MockServer,
    _tmp: TempDir,
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub async fn post_json(&self, path: &str, body: serde_json::Value) -> reqwest::Response {
        self.client
            .post(self.url(path))
            .json(&body)
            .send()
            .await
            .expect("request failed")
    }

    pub async fn create_user(&self, username: &str, password: &str) -> reqwest::Response {
        self.post_json(
            "/create-user",
            json!({ "username": username, "password": password }),
        )
        .await
    }

    pub async fn login(&self, username: &str, password: &str) -> reqwest::Response {
        self.post_json("/login", json!({ "username": username, "password": password }))
            .await
    }

    pub async fn upload(&self, form: reqwest::multipart::Form) -> reqwest::Response {
        self.client
            .post(self.url("/upload-and-extract-content"))
            .multipart(form)
            .send()
            .await
            .expect("request failed")
    }
}

/// OCR settings pointing the hosted engine at `mock`.
pub fn ocr_config(mock: &MockServer, api_key: Option<&str>) -> OcrConfig {
    OcrConfig {
        model: "ocrspace".to_string(),
        api_key: api_key.map(String::from),
        base_url: Some(mock.uri()),
        timeout_secs: 10,
        max_retries: 0,
        ..OcrConfig::default()
    }
}

/// Spawn the full router on an ephemeral port backed by a temp database and
/// a mock OCR engine holding the `server-key` credential.
pub async fn spawn_app() -> TestApp {
    spawn_app_with(|mock| ocr_config(mock, Some("server-key"))).await
}

pub async fn spawn_app_with(ocr: impl FnOnce(&MockServer) -> OcrConfig) -> TestApp {
    init_test_logger();

    let ocr_mock = MockServer::start().await;
    let tmp = TempDir::new().expect("Failed to create temp dir");
    let db_path = tmp.path().join("snapscribe_test.db");

    let mut config = Config::default();
    config.server.host = "127.0.0.1".to_string();
    config.server.port = 0;
    config.server.max_upload_bytes = 1024 * 1024;
    config.database = DatabaseConfig {
        url: format!("file:{}", db_path.display()),
        auth_token: None,
        local_path: None,
        busy_timeout_ms: 5000,
    };
    config.ocr = ocr(&ocr_mock);

    let db = Database::new(&config.database)
        .await
        .expect("Failed to create database");
    let db: Arc<dyn DatabaseBackend> = Arc::new(LibSqlBackend::new(db));
    let ocr = OcrProvider::new(&config.ocr).expect("Failed to create OCR");

    let app = create_router(AppState::new(config, db, ocr));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind");
    let addr = listener.local_addr().expect("Failed to get address");

    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Server failed");
    });

    TestApp {
        addr,
        client: reqwest::Client::new(),
        ocr_mock,
        _tmp: tmp,
    }
}

/// A blank grayscale PNG of the given size.
pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = image::DynamicImage::new_luma8(width, height);
    let mut out = Vec::new();
    img.write_to(&mut std::io::Cursor::new(&mut out), image::ImageFormat::Png)
        .expect("Failed to encode PNG");
    out
}

pub fn image_part(bytes: Vec<u8>) -> reqwest::multipart::Part {
    reqwest::multipart::Part::bytes(bytes)
        .file_name("scan.png")
        .mime_str("image/png")
        .expect("valid mime")
}

/// Body the hosted engine returns for a successful parse.
pub fn parsed_text_body(text: &str) -> serde_json::Value {
    json!({
        "ParsedResults": [{ "ParsedText": text, "FileParseExitCode": 1 }],
        "OCRExitCode": 1,
        "IsErroredOnProcessing": false
    })
}

/// Matches requests whose raw body contains `needle`.
///
/// Multipart uploads carry binary image data, so the body is searched as bytes
/// rather than decoded as UTF-8.
pub fn body_contains(needle: &str) -> impl Fn(&wiremock::Request) -> bool + Send + Sync + 'static {
    let needle = needle.as_bytes().to_vec();
    move |request: &wiremock::Request| {
        request
            .body
            .windows(needle.len())
            .any(|window| window == needle.as_slice())
    }
}

pub async fn body_json(response: reqwest::Response) -> serde_json::Value {
    response.json().await.expect("body was not JSON")
}
