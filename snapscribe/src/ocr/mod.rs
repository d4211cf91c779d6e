//! OCR (Optical Character Recognition) Module
//!
//! Text recognition is delegated to an external engine; this module only
//! adapts images and language hints to whichever engine is configured.
//!
//! # Architecture
//!
//! - `OcrProvider` is the single entry point used by the extraction service
//! - `local/tesseract` runs Tesseract in-process via leptess
//! - `ocrspace[/<engine>]` calls the hosted OCR.space HTTP API
//! - anything that fails to initialize degrades to an unavailable backend
//!
//! # Usage
//!
//! ```rust,ignore
//! let ocr = OcrProvider::new(&config.ocr)?;
//! validate_image_bytes(&bytes)?;
//! let png = preprocess_image(&bytes, &config.ocr)?;
//! let text = ocr.ocr(&png, Language::ENGLISH, None).await?;
//! ```

mod api;
mod language;
mod preprocessing;
mod provider;

pub use language::Language;
pub use preprocessing::{preprocess_image, validate_image_bytes};
pub use provider::OcrProvider;
