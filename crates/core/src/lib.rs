//! Storefront
//!
//! Checkout pricing and stock engine: cart aggregation, the staged discount
//! engine, coupon validation, loyalty redemption, outlet fulfillment, shipping
//! fees and order drafting. Pure logic with no I/O; persistence lives in
//! `storefront-app`.

pub mod cart;
pub mod channels;
pub mod coupons;
pub mod customers;
pub mod discounts;
pub mod fixtures;
pub mod fulfillment;
pub mod gift_cards;
pub mod loyalty;
pub mod orders;
pub mod outlets;
pub mod prelude;
pub mod pricing;
pub mod products;
pub mod shipping;
