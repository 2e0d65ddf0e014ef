//! Storefront Domain Concerns

pub mod catalog;
pub mod checkout;
pub mod coupons;
pub mod customers;
pub mod gift_cards;
pub mod orders;
pub mod outlets;
