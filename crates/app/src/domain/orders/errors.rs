//! Orders service errors.

use sqlx::{
    Error,
    error::{DatabaseError, ErrorKind},
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum OrdersServiceError {
    #[error("order already exists")]
    AlreadyExists,

    #[error("order not found")]
    NotFound,

    #[error("related resource not found")]
    InvalidReference,

    #[error("missing required data")]
    MissingRequiredData,

    #[error("invalid data")]
    InvalidData,

    #[error("storage error")]
    Sql(#[source] Error),

    #[error("an outlet is required to commit regular items")]
    OutletRequired,

    #[error("variant {0} no longer exists")]
    VariantNotFound(String),

    #[error("not enough stock for {name}: requested {requested}, available {available}")]
    InsufficientStock {
        sku: String,
        name: String,
        requested: u32,
        available: i64,
    },

    #[error("coupon {0} has reached its usage limit")]
    CouponExhausted(String),

    #[error("customer no longer has {0} loyalty points")]
    InsufficientPoints(i64),

    #[error("gift card {0} balance changed")]
    GiftCardBalanceChanged(String),
}

impl From<Error> for OrdersServiceError {
    fn from(error: Error) -> Self {
        if matches!(error, Error::RowNotFound) {
            return Self::NotFound;
        }

        match error.as_database_error().map(DatabaseError::kind) {
            Some(ErrorKind::UniqueViolation) => Self::AlreadyExists,
            Some(ErrorKind::ForeignKeyViolation) => Self::InvalidReference,
            Some(ErrorKind::NotNullViolation) => Self::MissingRequiredData,
            Some(ErrorKind::CheckViolation) => Self::InvalidData,
            Some(ErrorKind::Other | _) | None => Self::Sql(error),
        }
    }
}
