use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

use crate::config::OcrConfig;
use crate::error::{Result, ScribeError};

use super::Language;

const DEFAULT_BASE_URL: &str = "https://api.ocr.space";

/// Client for the hosted OCR.space `parse/image` endpoint.
#[derive(Clone, Debug)]
pub struct OcrSpaceClient {
    client: Client,
    api_key: Option<String>,
    base_url: String,
    engine: Option<String>,
    max_retries: u32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ParseResponse {
    #[serde(default)]
    parsed_results: Option<Vec<ParsedResult>>,
    #[serde(default)]
    is_errored_on_processing: bool,
    #[serde(default)]
    error_message: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ParsedResult {
    #[serde(default)]
    parsed_text: String,
}

impl OcrSpaceClient {
    /// `engine` is the optional OCR.space engine number (`"1"`, `"2"` or `"3"`).
    pub fn new(config: &OcrConfig, engine: Option<&str>) -> Result<Self> {
        let base_url = config
            .base_url
            .clone()
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        if let Some(engine) = engine {
            if !matches!(engine, "1" | "2" | "3") {
                return Err(ScribeError::Ocr(format!(
                    "Unknown OCR.space engine '{engine}' (expected 1, 2 or 3)"
                )));
            }
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ScribeError::Ocr(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_key: config.api_key.clone(),
            base_url,
            engine: engine.map(String::from),
            max_retries: config.max_retries,
        })
    }

    pub fn has_default_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// Run OCR on `image_bytes`. A non-empty `request_key` takes precedence
    /// over the configured key.
    pub async fn ocr(
        &self,
        image_bytes: &[u8],
        language: Language,
        request_key: Option<&str>,
    ) -> Result<String> {
        let api_key = request_key
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .or(self.api_key.as_deref())
            .ok_or_else(|| ScribeError::Validation("API key is required".to_string()))?;

        let mut retries = 0;

        loop {
            let response = self
                .client
                .post(format!("{}/parse/image", self.base_url))
                .multipart(self.build_form(image_bytes, language, api_key)?)
                .send()
                .await;

            match response {
                Ok(resp) => {
                    let status = resp.status();
                    if status.is_success() {
                        let parsed: ParseResponse = resp.json().await.map_err(|e| {
                            ScribeError::Ocr(format!("Failed to parse OCR response: {e}"))
                        })?;
                        return parsed.into_text();
                    } else if status.as_u16() == 429 || status.is_server_error() {
                        retries += 1;
                        if retries > self.max_retries {
                            return Err(ScribeError::Ocr(format!(
                                "OCR request failed after {} retries: {}",
                                self.max_retries, status
                            )));
                        }
                        tracing::warn!(%status, attempt = retries, "OCR request failed, retrying");
                        tokio::time::sleep(backoff_delay(retries)).await;
                    } else {
                        let body = resp.text().await.unwrap_or_default();
                        return Err(ScribeError::Ocr(format!(
                            "OCR request failed: {status} - {body}"
                        )));
                    }
                }
                Err(e) => {
                    retries += 1;
                    if retries > self.max_retries {
                        return Err(ScribeError::Ocr(format!(
                            "OCR request failed after {} retries: {e}",
                            self.max_retries
                        )));
                    }
                    tracing::warn!(error = %e, attempt = retries, "OCR request errored, retrying");
                    tokio::time::sleep(backoff_delay(retries)).await;
                }
            }
        }
    }

    fn build_form(&self, image_bytes: &[u8], language: Language, api_key: &str) -> Result<Form> {
        let part = Part::bytes(image_bytes.to_vec())
            .file_name("image.png")
            .mime_str("image/png")
            .map_err(|e| ScribeError::Ocr(format!("Failed to build upload: {e}")))?;

        let mut form = Form::new()
            .part("file", part)
            .text("apikey", api_key.to_string())
            .text("language", language.code())
            .text("isOverlayRequired", "false");

        if let Some(engine) = &self.engine {
            form = form.text("OCREngine", engine.clone());
        }

        Ok(form)
    }
}

impl ParseResponse {
    fn into_text(self) -> Result<String> {
        if self.is_errored_on_processing {
            return Err(ScribeError::Ocr(format!(
                "OCR engine reported an error: {}",
                describe_error(self.error_message.as_ref())
            )));
        }

        match self.parsed_results {
            Some(results) if !results.is_empty() => Ok(results
                .into_iter()
                .map(|r| r.parsed_text)
                .collect::<Vec<_>>()
                .concat()),
            _ => Err(ScribeError::Ocr(
                "OCR response did not contain any parsed results".to_string(),
            )),
        }
    }
}

/// The engine reports errors either as a string or an array of strings.
fn describe_error(message: Option<&serde_json::Value>) -> String {
    match message {
        Some(serde_json::Value::String(s)) => s.clone(),
        Some(serde_json::Value::Array(items)) => items
            .iter()
            .filter_map(|v| v.as_str())
            .collect::<Vec<_>>()
            .join("; "),
        Some(other) => other.to_string(),
        None => "unknown error".to_string(),
    }
}

fn backoff_delay(attempt: u32) -> Duration {
    Duration::from_millis(100 * 2_u64.pow(attempt.min(6)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn create_test_config() -> OcrConfig {
        OcrConfig {
            model: "ocrspace".to_string(),
            ..OcrConfig::default()
        }
    }

    fn parse(body: serde_json::Value) -> Result<String> {
        serde_json::from_value::<ParseResponse>(body)
            .unwrap()
            .into_text()
    }

    #[test]
    fn test_default_base_url() {
        let client = OcrSpaceClient::new(&create_test_config(), None).unwrap();
        assert_eq!(client.base_url, "https://api.ocr.space");
        assert!(!client.has_default_key());
    }

    #[test]
    fn test_custom_base_url_trailing_slash_trimmed() {
        let mut config = create_test_config();
        config.base_url = Some("http://localhost:9999/".to_string());
        let client = OcrSpaceClient::new(&config, Some("2")).unwrap();
        assert_eq!(client.base_url, "http://localhost:9999");
        assert_eq!(client.engine.as_deref(), Some("2"));
    }

    #[test]
    fn test_unknown_engine_rejected() {
        assert!(OcrSpaceClient::new(&create_test_config(), Some("9")).is_err());
    }

    #[tokio::test]
    async fn test_missing_key_is_validation_error() {
        let client = OcrSpaceClient::new(&create_test_config(), None).unwrap();
        let err = client
            .ocr(b"bytes", Language::ENGLISH, Some("  "))
            .await
            .unwrap_err();
        assert!(matches!(err, ScribeError::Validation(_)));
        assert!(err.to_string().contains("API key is required"));
    }

    #[test]
    fn test_parsed_results_concatenated_verbatim() {
        let text = parse(json!({
            "ParsedResults": [
                { "ParsedText": "Page one \r\n" },
                { "ParsedText": "Page two" }
            ],
            "OCRExitCode": 1,
            "IsErroredOnProcessing": false
        }))
        .unwrap();
        assert_eq!(text, "Page one \r\nPage two");
    }

    #[test]
    fn test_errored_response_carries_message() {
        let err = parse(json!({
            "IsErroredOnProcessing": true,
            "ErrorMessage": ["E301: Unable to recognize the file type", "second"]
        }))
        .unwrap_err();
        assert!(err.to_string().contains("E301"));
        assert!(err.to_string().contains("second"));
    }

    #[test]
    fn test_errored_response_string_message() {
        let err = parse(json!({
            "IsErroredOnProcessing": true,
            "ErrorMessage": "Invalid API key"
        }))
        .unwrap_err();
        assert!(err.to_string().contains("Invalid API key"));
    }

    #[test]
    fn test_missing_parsed_results_is_error() {
        assert!(parse(json!({ "OCRExitCode": 99 })).is_err());
        assert!(parse(json!({ "ParsedResults": [] })).is_err());
    }

    #[test]
    fn test_backoff_grows() {
        assert!(backoff_delay(2) > backoff_delay(1));
        assert_eq!(backoff_delay(1), Duration::from_millis(200));
    }
}
