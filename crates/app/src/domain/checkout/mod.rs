//! Checkout
//!
//! The single pricing and order-placement flow behind every checkout channel.

pub mod data;
pub mod errors;
pub mod service;

pub use errors::CheckoutServiceError;
pub use service::*;
