//! Checkout Handlers

pub(crate) mod coupons;
pub(crate) mod outlets;
pub(crate) mod quote;
