//! Shipping fees

use rusty_money::{Money, iso::Currency};
use serde::{Deserialize, Serialize};

use crate::{cart::Cart, channels::CheckoutChannel, fulfillment::OutletSelection};

/// Flat-rate delivery tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShippingTier {
    /// Nearest outlet is inside the express radius.
    Express,

    /// Delivery address is in the outlet's district.
    InsideDistrict,

    /// Delivery address is in another district.
    OutsideDistrict,

    /// Collected at the counter.
    Pickup,
}

impl ShippingTier {
    /// Delivery estimate in days, as an inclusive range.
    pub const fn estimate_days(self) -> (u8, u8) {
        match self {
            Self::Express | Self::Pickup => (0, 0),
            Self::InsideDistrict => (1, 2),
            Self::OutsideDistrict => (3, 5),
        }
    }
}

/// Fees per tier, in minor units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShippingRates {
    /// Express fee
    pub express: i64,

    /// Same-district fee
    pub inside_district: i64,

    /// Other-district fee
    pub outside_district: i64,
}

impl ShippingRates {
    /// Default taka rates: ৳40 express, ৳60 inside and ৳120 outside the district.
    pub const fn bdt_defaults() -> Self {
        Self {
            express: 4_000,
            inside_district: 6_000,
            outside_district: 12_000,
        }
    }

    fn fee(&self, tier: ShippingTier) -> i64 {
        match tier {
            ShippingTier::Express => self.express,
            ShippingTier::InsideDistrict => self.inside_district,
            ShippingTier::OutsideDistrict => self.outside_district,
            ShippingTier::Pickup => 0,
        }
    }
}

impl Default for ShippingRates {
    fn default() -> Self {
        Self::bdt_defaults()
    }
}

/// Shipping quote
#[derive(Debug, Clone, PartialEq)]
pub struct ShippingQuote<'a> {
    /// Tier that applied
    pub tier: ShippingTier,

    /// Fee
    pub fee: Money<'a, Currency>,

    /// Estimated delivery window in days
    pub estimate_days: (u8, u8),
}

/// Quote delivery for `cart`.
///
/// Counter sales are free. Express needs regular lines and an outlet within the
/// express radius; otherwise the delivery district is compared with the
/// outlet's. Without a known district the outside rate applies.
pub fn quote_shipping<'a>(
    channel: CheckoutChannel,
    cart: &Cart<'_>,
    selection: Option<&OutletSelection<'_>>,
    delivery_district: Option<&str>,
    rates: &ShippingRates,
) -> ShippingQuote<'a> {
    let tier = if channel == CheckoutChannel::OutletPos {
        ShippingTier::Pickup
    } else if cart.has_regular_lines() && selection.is_some_and(|s| s.express_eligible) {
        ShippingTier::Express
    } else {
        match (selection, delivery_district) {
            (Some(selection), Some(district))
                if selection.outlet.district.trim().eq_ignore_ascii_case(district.trim()) =>
            {
                ShippingTier::InsideDistrict
            }
            _ => ShippingTier::OutsideDistrict,
        }
    };

    ShippingQuote {
        tier,
        fee: Money::from_minor(rates.fee(tier), cart.currency()),
        estimate_days: tier.estimate_days(),
    }
}
