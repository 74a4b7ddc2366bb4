use thiserror::Error;

use crate::repository::errors::{CheckoutError, RepositoryError};

pub mod admin;
pub mod auth;
pub mod cart;
pub mod main;
pub mod products;

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Errors surfaced at the service boundary.
///
/// Routes translate each variant into a flash message and redirect;
/// anything unexpected becomes a logged 500.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("unauthorized")]
    Unauthorized,
    #[error("not found")]
    NotFound,
    #[error("already exists")]
    Conflict,
    #[error("{0}")]
    Form(String),
    #[error(transparent)]
    Checkout(#[from] CheckoutError),
    #[error("repository error: {0}")]
    Repository(RepositoryError),
}

impl From<RepositoryError> for ServiceError {
    fn from(value: RepositoryError) -> Self {
        match value {
            RepositoryError::NotFound => Self::NotFound,
            RepositoryError::Conflict => Self::Conflict,
            other => Self::Repository(other),
        }
    }
}
