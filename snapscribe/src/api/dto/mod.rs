//! Request and response bodies for the HTTP API.
//!
//! These are kept apart from the domain models in `src/models/` so the wire
//! format can be documented and validated without leaking storage fields.

pub mod ocr;
pub mod users;

pub use ocr::*;
pub use users::*;
