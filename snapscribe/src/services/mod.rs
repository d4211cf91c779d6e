mod extraction;
mod users;

pub use extraction::ExtractionService;
pub use users::UserService;
