//! Gift cards service errors.

use sqlx::Error;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GiftCardsServiceError {
    #[error("storage error")]
    Sql(#[source] Error),
}

impl From<Error> for GiftCardsServiceError {
    fn from(error: Error) -> Self {
        Self::Sql(error)
    }
}
