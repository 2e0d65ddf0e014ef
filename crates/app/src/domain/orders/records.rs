//! Order Records

use jiff::Timestamp;
use storefront::{
    channels::CheckoutChannel,
    loyalty::LedgerEntry,
    orders::{OrderStatus, OrderType, PaymentMethod, PaymentStatus},
};

use crate::{
    domain::{
        catalog::records::ProductUuid, customers::records::CustomerUuid,
        outlets::records::OutletUuid,
    },
    uuids::TypedUuid,
};

/// Order UUID
pub type OrderUuid = TypedUuid<OrderRecord>;

/// Order Item UUID
pub type OrderItemUuid = TypedUuid<OrderItemRecord>;

/// Loyalty Ledger Entry UUID
pub type LedgerEntryUuid = TypedUuid<LedgerEntry>;

/// Order Record
///
/// Amounts are minor units of `currency`. `subtotal` is what is payable before
/// discounts: regular lines plus pre-order deposits.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderRecord {
    pub uuid: OrderUuid,
    pub customer_uuid: CustomerUuid,
    pub channel: CheckoutChannel,
    pub order_type: OrderType,
    pub status: OrderStatus,
    pub payment_status: PaymentStatus,
    pub payment_method: PaymentMethod,
    pub currency: String,
    pub subtotal: i64,
    pub card_promo_discount_amount: i64,
    pub discount_amount: i64,
    pub promo_code: Option<String>,
    pub loyalty_points_used: i64,
    pub loyalty_discount: i64,
    pub gift_card_code: Option<String>,
    pub gift_card_discount: i64,
    pub shipping_fee: i64,
    pub total_amount: i64,
    pub full_order_value: i64,
    pub assigned_outlet_uuid: Option<OutletUuid>,
    pub items: Vec<OrderItemRecord>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Order Item Record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderItemRecord {
    pub uuid: OrderItemUuid,
    pub product_uuid: ProductUuid,
    pub sku: String,
    pub name: String,
    pub quantity: u32,
    pub unit_price: i64,
    pub is_pre_order: bool,
    pub payable_now: i64,
}
