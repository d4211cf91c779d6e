use std::sync::Arc;

use crate::config::Config;
use crate::db::DatabaseBackend;
use crate::ocr::OcrProvider;
use crate::services::{ExtractionService, UserService};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub db: Arc<dyn DatabaseBackend>,
    pub users: UserService,
    pub extraction: ExtractionService,
}

impl AppState {
    pub fn new(config: Config, db: Arc<dyn DatabaseBackend>, ocr: OcrProvider) -> Self {
        let config = Arc::new(config);
        let users = UserService::new(db.clone());
        let extraction = ExtractionService::new(ocr, &config.ocr);

        Self {
            config,
            db,
            users,
            extraction,
        }
    }
}
