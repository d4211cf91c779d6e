use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::config::OcrConfig;
use crate::error::{Result, ScribeError};
use crate::models::OcrResult;
use crate::ocr::{preprocess_image, validate_image_bytes, Language, OcrProvider};

/// Turns an uploaded image into text plus its derived word and integer lists.
#[derive(Clone)]
pub struct ExtractionService {
    ocr: OcrProvider,
    config: Arc<OcrConfig>,
    default_language: Language,
}

impl ExtractionService {
    pub fn new(ocr: OcrProvider, config: &OcrConfig) -> Self {
        let default_language = Language::parse(&config.default_language).unwrap_or_else(|e| {
            warn!("{e}; using eng as the default OCR language");
            Language::ENGLISH
        });

        Self {
            ocr,
            config: Arc::new(config.clone()),
            default_language,
        }
    }

    pub fn ocr(&self) -> &OcrProvider {
        &self.ocr
    }

    /// Run OCR over `image` and tokenize the result.
    ///
    /// `language` defaults to the configured language when absent or blank.
    /// `api_key` is handed to the engine as-is and never logged.
    pub async fn extract(
        &self,
        image: Vec<u8>,
        language: Option<&str>,
        api_key: Option<&str>,
    ) -> Result<OcrResult> {
        validate_image_bytes(&image)?;
        let language = Language::parse_or(language, self.default_language)?;

        debug!(
            bytes = image.len(),
            language = %language,
            has_api_key = api_key.is_some(),
            "Starting extraction"
        );

        let config = Arc::clone(&self.config);
        let prepared = tokio::task::spawn_blocking(move || preprocess_image(&image, &config))
            .await
            .map_err(|e| ScribeError::Internal(format!("Image preprocessing task failed: {e}")))??;

        let text = self.ocr.ocr(&prepared, language, api_key).await?;
        let result = OcrResult::from_text(text);

        info!(
            engine = self.ocr.engine_name(),
            language = %language,
            chars = result.extracted_content.len(),
            words = result.words.len(),
            integers = result.integers.len(),
            "Extraction complete"
        );

        Ok(result)
    }
}
