use serde::{Deserialize, Serialize};

use crate::models::OcrResult;

/// Multipart form accepted by `POST /upload-and-extract-content`.
///
/// Only used for API documentation; the handler reads the parts directly.
#[derive(Debug, utoipa::ToSchema)]
pub struct UploadForm {
    /// Image file to run OCR on.
    #[schema(value_type = String, format = Binary)]
    pub image: Vec<u8>,
    /// Credential forwarded to the hosted OCR engine, if one is configured.
    pub api_key: Option<String>,
    /// OCR language code such as `eng` or `ger`. Defaults to `eng`.
    pub language: Option<String>,
}

/// Text found in the uploaded image.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ExtractContentResponse {
    /// Raw text as returned by the OCR engine.
    pub extracted_content: String,
    /// Runs of ASCII letters, in order of appearance.
    pub words: Vec<String>,
    /// Runs of decimal digits, in order of appearance.
    pub integers: Vec<i64>,
}

impl From<OcrResult> for ExtractContentResponse {
    fn from(result: OcrResult) -> Self {
        Self {
            extracted_content: result.extracted_content,
            words: result.words,
            integers: result.integers,
        }
    }
}
