use thiserror::Error;

pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Errors surfaced by the persistence layer.
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("entity not found")]
    NotFound,
    #[error("entity already exists")]
    Conflict,
    #[error("database error: {0}")]
    Database(diesel::result::Error),
    #[error("connection pool error: {0}")]
    Pool(#[from] diesel::r2d2::PoolError),
}

impl From<diesel::result::Error> for RepositoryError {
    fn from(value: diesel::result::Error) -> Self {
        match value {
            diesel::result::Error::NotFound => Self::NotFound,
            diesel::result::Error::DatabaseError(
                diesel::result::DatabaseErrorKind::UniqueViolation,
                _,
            ) => Self::Conflict,
            other => Self::Database(other),
        }
    }
}

/// Why a checkout attempt was rejected.
///
/// Every variant aborts the whole transaction: a failed checkout leaves no
/// order, no order items and no stock change behind. The messages are shown
/// to the customer as-is.
#[derive(Debug, Error)]
pub enum CheckoutError {
    #[error("your cart is empty")]
    EmptyCart,
    #[error("product \"{name}\" is no longer available")]
    ProductUnavailable { name: String },
    #[error("not enough stock for \"{name}\": only {available} left")]
    InsufficientStock { name: String, available: i32 },
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl From<diesel::result::Error> for CheckoutError {
    fn from(value: diesel::result::Error) -> Self {
        Self::Repository(value.into())
    }
}
