pub(crate) mod health;
pub mod ocr;
pub mod users;

pub use health::health_check;
