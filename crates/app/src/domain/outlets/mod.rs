//! Outlets

pub mod errors;
pub mod records;
mod repository;
pub mod service;

pub use errors::OutletsServiceError;
pub use service::*;
