//! Gift Cards

pub mod errors;
pub mod records;
mod repository;
pub mod service;

pub use errors::GiftCardsServiceError;
pub use service::*;
