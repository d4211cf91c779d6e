//! Snapscribe: an HTTP service that extracts text from images and keeps a
//! minimal username/password store.

pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod ocr;
pub mod services;

pub use error::{Result, ScribeError};
