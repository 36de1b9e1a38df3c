pub mod errors;
pub mod listing;

pub use errors::{ServiceError, ServiceResult};
