//! Pricing Config

use clap::Args;

use storefront::shipping::ShippingRates;
use storefront_app::domain::checkout::data::CheckoutSettings;

/// Loyalty point value and flat shipping rates, in minor units.
#[derive(Debug, Args)]
pub struct PricingConfig {
    /// Minor units one loyalty point is worth
    #[arg(long, env = "LOYALTY_POINT_VALUE_MINOR", default_value_t = 100_i64)]
    pub loyalty_point_value_minor: i64,

    /// Express delivery fee
    #[arg(long, env = "SHIPPING_EXPRESS_FEE_MINOR", default_value_t = 4_000_i64)]
    pub shipping_express_fee_minor: i64,

    /// Delivery fee inside the outlet's district
    #[arg(long, env = "SHIPPING_INSIDE_DISTRICT_FEE_MINOR", default_value_t = 6_000_i64)]
    pub shipping_inside_district_fee_minor: i64,

    /// Delivery fee outside the outlet's district
    #[arg(long, env = "SHIPPING_OUTSIDE_DISTRICT_FEE_MINOR", default_value_t = 12_000_i64)]
    pub shipping_outside_district_fee_minor: i64,
}

impl PricingConfig {
    #[must_use]
    pub fn checkout_settings(&self) -> CheckoutSettings {
        CheckoutSettings {
            point_value: self.loyalty_point_value_minor,
            shipping_rates: ShippingRates {
                express: self.shipping_express_fee_minor,
                inside_district: self.shipping_inside_district_fee_minor,
                outside_district: self.shipping_outside_district_fee_minor,
            },
            ..CheckoutSettings::default()
        }
    }
}
