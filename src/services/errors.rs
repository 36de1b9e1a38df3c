use thiserror::Error;

use crate::controller::ControllerError;
use crate::forms::FormError;
use crate::repository::errors::RepositoryError;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),

    #[error("Controller error: {0}")]
    Controller(#[from] ControllerError),

    #[error("Form error: {0}")]
    Form(#[from] FormError),
}

pub type ServiceResult<T> = Result<T, ServiceError>;
