mod ocr;
mod user;

pub use ocr::*;
pub use user::*;
