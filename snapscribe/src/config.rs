use serde::Deserialize;
use std::env;

fn parse_env_or<T: std::str::FromStr>(var: &str, default: T) -> T
where
    T::Err: std::fmt::Display,
{
    match env::var(var) {
        Ok(val) => match val.parse() {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::warn!("Invalid value '{}' for {}: {}. Using default.", val, var, e);
                default
            }
        },
        Err(_) => default,
    }
}

/// Read an optional string variable, treating an empty value as unset.
fn env_non_empty(var: &str) -> Option<String> {
    env::var(var)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub ocr: OcrConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub max_upload_bytes: usize,
    pub log_format: LogFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

impl std::str::FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pretty" | "text" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(format!("unknown log format '{other}' (expected pretty or json)")),
        }
    }
}

impl LogFormat {
    /// Read `LOG_FORMAT` without logging, before any subscriber exists.
    ///
    /// An invalid value falls back to pretty; `Config::from_env` reports it.
    pub fn from_env() -> Self {
        env::var("LOG_FORMAT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(LogFormat::Pretty)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub auth_token: Option<String>,
    pub local_path: Option<String>,
    pub busy_timeout_ms: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OcrConfig {
    /// Engine selector, e.g. `local/tesseract` or `ocrspace/2`.
    pub model: String,
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub default_language: String,
    pub timeout_secs: u64,
    pub max_retries: u32,
    pub max_image_dimension: u32,
    pub min_image_dimension: u32,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            model: "local/tesseract".to_string(),
            api_key: None,
            base_url: None,
            default_language: "eng".to_string(),
            timeout_secs: 60,
            max_retries: 3,
            max_image_dimension: 4096,
            min_image_dimension: 20,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: env::var("SNAPSCRIBE_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: parse_env_or("SNAPSCRIBE_PORT", 3000),
                max_upload_bytes: parse_env_or("SNAPSCRIBE_MAX_UPLOAD_BYTES", 10 * 1024 * 1024),
                log_format: parse_env_or("LOG_FORMAT", LogFormat::Pretty),
            },
            database: DatabaseConfig {
                url: env::var("DATABASE_URL").unwrap_or_else(|_| "file:snapscribe.db".to_string()),
                auth_token: env_non_empty("DATABASE_AUTH_TOKEN"),
                local_path: env_non_empty("DATABASE_LOCAL_PATH"),
                busy_timeout_ms: parse_env_or("DATABASE_BUSY_TIMEOUT_MS", 5000),
            },
            ocr: OcrConfig {
                model: env::var("OCR_MODEL").unwrap_or_else(|_| "local/tesseract".to_string()),
                api_key: env_non_empty("OCR_API_KEY"),
                base_url: env_non_empty("OCR_BASE_URL"),
                default_language: env::var("OCR_DEFAULT_LANGUAGE")
                    .unwrap_or_else(|_| "eng".to_string()),
                timeout_secs: parse_env_or("OCR_TIMEOUT", 60),
                max_retries: parse_env_or("OCR_MAX_RETRIES", 3),
                max_image_dimension: parse_env_or("OCR_MAX_DIMENSION", 4096),
                min_image_dimension: parse_env_or("OCR_MIN_DIMENSION", 20),
            },
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::default()
    }
}

/// Split an OCR model string into `(provider, variant)`.
///
/// `"ocrspace/2"` yields `("ocrspace", Some("2"))`; a bare `"ocrspace"` has no variant.
pub fn parse_ocr_model(model: &str) -> (String, Option<&str>) {
    match model.split_once('/') {
        Some((prefix, rest)) if !rest.is_empty() => (prefix.trim().to_lowercase(), Some(rest)),
        Some((prefix, _)) => (prefix.trim().to_lowercase(), None),
        None => (model.trim().to_lowercase(), None),
    }
}
