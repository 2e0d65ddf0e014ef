//! Checkout Data

use rusty_money::iso::{self, Currency};
use serde::{Deserialize, Serialize};
use storefront::{
    channels::CheckoutChannel,
    outlets::GeoPoint,
    pricing::PricingBreakdown,
    shipping::{ShippingQuote, ShippingRates},
};

use crate::{
    domain::{
        catalog::records::ProductUuid,
        customers::records::CustomerUuid,
        orders::records::{OrderRecord, OrderUuid},
        outlets::records::OutletUuid,
    },
    payments::PaymentSession,
};

/// A requested cart line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutLine {
    pub product: ProductUuid,
    pub sku: String,
    pub quantity: u32,
}

/// Where a delivery goes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeliveryAddress {
    pub district: String,
    pub location: Option<GeoPoint>,
}

/// Everything a checkout attempt asks for.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckoutRequest {
    pub channel: CheckoutChannel,
    pub customer: CustomerUuid,
    pub lines: Vec<CheckoutLine>,
    pub coupon_code: Option<String>,
    pub gift_card_code: Option<String>,

    /// Loyalty points the customer wants to spend
    pub points: i64,

    /// Outlet pinned by a POS terminal or a sales rep
    pub outlet: Option<OutletUuid>,

    /// Delivery address; the customer's first saved address when absent
    pub delivery: Option<DeliveryAddress>,
}

/// The outlet chosen to fulfill a cart.
#[derive(Debug, Clone, PartialEq)]
pub struct FulfillmentOutlet {
    pub uuid: OutletUuid,
    pub name: String,
    pub district: String,
    pub distance_km: Option<f64>,
    pub express_eligible: bool,
}

/// A priced cart.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckoutQuote {
    /// Discount breakdown with shipping applied
    pub breakdown: PricingBreakdown,

    /// `None` when no outlet can fulfill the regular lines
    pub outlet: Option<FulfillmentOutlet>,

    pub shipping: ShippingQuote<'static>,
}

/// A committed order and, for online payments, where to pay for it.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedOrder {
    pub order: OrderRecord,
    pub payment: Option<PaymentSession>,
}

impl PlacedOrder {
    #[must_use]
    pub fn uuid(&self) -> OrderUuid {
        self.order.uuid
    }
}

/// Pricing settings shared by every checkout.
#[derive(Debug, Clone, Copy)]
pub struct CheckoutSettings {
    pub currency: &'static Currency,

    /// Minor units one loyalty point is worth
    pub point_value: i64,

    pub shipping_rates: ShippingRates,
}

impl Default for CheckoutSettings {
    fn default() -> Self {
        Self {
            currency: iso::BDT,
            point_value: 100,
            shipping_rates: ShippingRates::default(),
        }
    }
}
