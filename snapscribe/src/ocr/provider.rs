use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use leptess::LepTess;
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::config::{parse_ocr_model, OcrConfig};
use crate::error::{Result, ScribeError};

use super::api::OcrSpaceClient;
use super::Language;

type EnginePool<E> = Mutex<HashMap<&'static str, Arc<Mutex<E>>>>;
type TesseractPool = Arc<EnginePool<LepTess>>;

#[derive(Clone)]
enum OcrBackend {
    /// One Tesseract instance per traineddata name, created on first use.
    Local { engines: TesseractPool },
    Api { client: OcrSpaceClient },
    Unavailable { reason: String },
}

/// Entry point to whichever OCR engine is configured.
#[derive(Clone)]
pub struct OcrProvider {
    backend: OcrBackend,
    config: OcrConfig,
}

fn create_tesseract(language: &str) -> std::result::Result<LepTess, String> {
    LepTess::new(None, language).map_err(|e| e.to_string())
}

/// Fetch the engine for `code`, creating it with the pool unlocked.
///
/// Must run on a blocking thread. If two callers race to create the same
/// engine, the first insert wins and the other instance is dropped.
fn checkout_engine<E>(
    pool: &EnginePool<E>,
    code: &'static str,
    create: impl FnOnce() -> Result<E>,
) -> Result<Arc<Mutex<E>>> {
    if let Some(engine) = pool.blocking_lock().get(code) {
        return Ok(Arc::clone(engine));
    }

    let created = create()?;
    let mut pool = pool.blocking_lock();
    Ok(Arc::clone(
        pool.entry(code)
            .or_insert_with(|| Arc::new(Mutex::new(created))),
    ))
}

impl OcrProvider {
    pub fn new(config: &OcrConfig) -> Result<Self> {
        let (provider, variant) = parse_ocr_model(&config.model);

        let backend = match provider.as_str() {
            "ocrspace" => match OcrSpaceClient::new(config, variant) {
                Ok(client) => {
                    if !client.has_default_key() {
                        warn!("OCR_API_KEY not set - uploads must supply their own api_key");
                    }
                    info!("OCR.space API backend initialized");
                    OcrBackend::Api { client }
                }
                Err(e) => {
                    let reason = format!("OCR.space backend unavailable: {e}");
                    warn!("{}", reason);
                    OcrBackend::Unavailable { reason }
                }
            },
            "local" | "tesseract" => {
                let default_language = Language::parse(&config.default_language)
                    .unwrap_or_else(|e| {
                        warn!("{e}; falling back to eng for the default engine");
                        Language::ENGLISH
                    });

                match create_tesseract(default_language.tesseract_code()) {
                    Ok(lt) => {
                        info!(
                            language = default_language.tesseract_code(),
                            "Tesseract OCR backend initialized"
                        );
                        let mut engines = HashMap::new();
                        engines.insert(
                            default_language.tesseract_code(),
                            Arc::new(Mutex::new(lt)),
                        );
                        OcrBackend::Local {
                            engines: Arc::new(Mutex::new(engines)),
                        }
                    }
                    Err(e) => {
                        let reason = format!("Tesseract unavailable: {e}");
                        warn!("{}", reason);
                        OcrBackend::Unavailable { reason }
                    }
                }
            }
            other => {
                let reason = format!("Unknown OCR model provider '{other}'");
                warn!("{}", reason);
                OcrBackend::Unavailable { reason }
            }
        };

        Ok(Self {
            backend,
            config: config.clone(),
        })
    }

    pub fn is_available(&self) -> bool {
        !matches!(self.backend, OcrBackend::Unavailable { .. })
    }

    pub fn engine_name(&self) -> &'static str {
        match self.backend {
            OcrBackend::Local { .. } => "tesseract",
            OcrBackend::Api { .. } => "ocrspace",
            OcrBackend::Unavailable { .. } => "unavailable",
        }
    }

    /// Extract text from preprocessed image bytes.
    ///
    /// `request_key` is forwarded to the hosted engine and ignored locally.
    pub async fn ocr(
        &self,
        image_bytes: &[u8],
        language: Language,
        request_key: Option<&str>,
    ) -> Result<String> {
        let timeout_duration = Duration::from_secs(self.config.timeout_secs);

        let result = tokio::time::timeout(
            timeout_duration,
            self.ocr_internal(image_bytes, language, request_key),
        )
        .await;

        match result {
            Ok(inner_result) => inner_result,
            Err(_) => Err(ScribeError::Ocr(format!(
                "OCR operation timed out after {} seconds",
                self.config.timeout_secs
            ))),
        }
    }

    async fn ocr_internal(
        &self,
        image_bytes: &[u8],
        language: Language,
        request_key: Option<&str>,
    ) -> Result<String> {
        match &self.backend {
            OcrBackend::Local { engines } => {
                let bytes = image_bytes.to_vec();
                let engines = Arc::clone(engines);

                let text = tokio::task::spawn_blocking(move || {
                    let code = language.tesseract_code();
                    let engine = checkout_engine(&engines, code, || {
                        create_tesseract(code).map_err(|e| {
                            ScribeError::Ocr(format!("Tesseract language '{code}' unavailable: {e}"))
                        })
                    })?;

                    let mut lt = engine.blocking_lock();
                    lt.set_image_from_mem(&bytes)
                        .map_err(|e| ScribeError::Ocr(format!("Failed to set image: {e}")))?;
                    lt.get_utf8_text()
                        .map_err(|e| ScribeError::Ocr(format!("Failed to extract text: {e}")))
                })
                .await
                .map_err(|e| ScribeError::Ocr(format!("OCR task panicked: {e}")))??;

                Ok(text)
            }
            OcrBackend::Api { client } => client.ocr(image_bytes, language, request_key).await,
            OcrBackend::Unavailable { reason } => {
                Err(ScribeError::OcrUnavailable(reason.clone()))
            }
        }
    }
}
