//! Form definitions validating table state at the UI boundary.

use thiserror::Error;
use validator::ValidationErrors;

use crate::domain::types::TypeConstraintError;

pub mod table;

#[derive(Debug, Error)]
/// Errors that can occur when processing form data.
pub enum FormError {
    #[error("validation errors: {0}")]
    Validation(#[from] ValidationErrors),

    #[error(transparent)]
    Constraint(#[from] TypeConstraintError),

    #[error("malformed query string: {0}")]
    Malformed(String),

    #[error("invalid date: {0}")]
    InvalidDate(String),

    #[error("start date is after end date")]
    InvalidDateRange,
}
