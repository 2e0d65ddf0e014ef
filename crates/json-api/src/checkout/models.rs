//! Checkout Models
//!
//! Wire shapes of checkout requests and quotes. Amounts are minor units of
//! `currency`.

use salvo::{http::StatusError, oapi::ToSchema};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use storefront::{
    channels::CheckoutChannel,
    coupons::{AppliedCoupon, CouponRejection},
    outlets::GeoPoint,
    shipping::{ShippingQuote, ShippingTier},
};
use storefront_app::domain::{
    catalog::records::ProductUuid,
    checkout::data::{
        CheckoutLine, CheckoutQuote, CheckoutRequest, DeliveryAddress, FulfillmentOutlet,
    },
    customers::records::CustomerUuid,
    outlets::records::OutletUuid,
};

/// Cart line
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub(crate) struct LinePayload {
    /// Product UUID
    pub product: Uuid,

    /// Variant SKU
    pub sku: String,

    pub quantity: u32,
}

impl From<LinePayload> for CheckoutLine {
    fn from(line: LinePayload) -> Self {
        CheckoutLine {
            product: ProductUuid::from_uuid(line.product),
            sku: line.sku,
            quantity: line.quantity,
        }
    }
}

pub(crate) fn into_lines(lines: Vec<LinePayload>) -> Vec<CheckoutLine> {
    lines.into_iter().map(CheckoutLine::from).collect()
}

/// Coordinates in decimal degrees
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema)]
pub(crate) struct LocationPayload {
    pub lat: f64,
    pub lng: f64,
}

impl From<LocationPayload> for GeoPoint {
    fn from(location: LocationPayload) -> Self {
        GeoPoint::new(location.lat, location.lng)
    }
}

/// Delivery address
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub(crate) struct DeliveryPayload {
    pub district: String,
    pub location: Option<LocationPayload>,
}

/// Checkout Request
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub(crate) struct CheckoutPayload {
    /// `storefront`, `outlet_pos`, `sales_rep` or `summary`
    pub channel: String,

    /// Customer the order is for
    pub customer: Uuid,

    pub lines: Vec<LinePayload>,

    pub coupon_code: Option<String>,

    pub gift_card_code: Option<String>,

    /// Loyalty points to redeem
    #[serde(default)]
    pub points: i64,

    /// Outlet of a POS terminal, or one pinned by a sales rep
    pub outlet: Option<Uuid>,

    /// Delivery address; the customer's first saved address when omitted
    pub delivery: Option<DeliveryPayload>,
}

impl CheckoutPayload {
    /// Validate the payload into a service request.
    pub(crate) fn into_request(self) -> Result<CheckoutRequest, StatusError> {
        let channel = CheckoutChannel::parse(&self.channel).ok_or_else(|| {
            StatusError::bad_request().brief(format!("Unknown checkout channel {:?}", self.channel))
        })?;

        if self.points < 0 {
            return Err(StatusError::bad_request().brief("Points cannot be negative"));
        }

        Ok(CheckoutRequest {
            channel,
            customer: CustomerUuid::from_uuid(self.customer),
            lines: into_lines(self.lines),
            coupon_code: self.coupon_code,
            gift_card_code: self.gift_card_code,
            points: self.points,
            outlet: self.outlet.map(OutletUuid::from_uuid),
            delivery: self.delivery.map(|delivery| DeliveryAddress {
                district: delivery.district,
                location: delivery.location.map(GeoPoint::from),
            }),
        })
    }
}

/// Why a coupon was not applied
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub(crate) struct CouponRejectionResponse {
    /// Machine-readable reason, e.g. `expired`
    pub reason: String,

    pub message: String,
}

impl From<&CouponRejection> for CouponRejectionResponse {
    fn from(rejection: &CouponRejection) -> Self {
        CouponRejectionResponse {
            reason: rejection.as_str().to_string(),
            message: rejection.to_string(),
        }
    }
}

/// Delivery tier and fee
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub(crate) struct ShippingResponse {
    /// `express`, `inside_district`, `outside_district` or `pickup`
    pub tier: String,

    pub fee: i64,

    /// Earliest delivery, in days
    pub min_days: u8,

    /// Latest delivery, in days
    pub max_days: u8,
}

impl From<&ShippingQuote<'_>> for ShippingResponse {
    fn from(quote: &ShippingQuote<'_>) -> Self {
        let tier = match quote.tier {
            ShippingTier::Express => "express",
            ShippingTier::InsideDistrict => "inside_district",
            ShippingTier::OutsideDistrict => "outside_district",
            ShippingTier::Pickup => "pickup",
        };

        ShippingResponse {
            tier: tier.to_string(),
            fee: quote.fee.to_minor_units(),
            min_days: quote.estimate_days.0,
            max_days: quote.estimate_days.1,
        }
    }
}

/// Fulfilling outlet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub(crate) struct OutletResponse {
    pub uuid: Uuid,
    pub name: String,
    pub district: String,

    /// Distance from the delivery location, when it is known
    pub distance_km: Option<f64>,

    /// Within the express delivery radius
    pub express_eligible: bool,
}

impl From<FulfillmentOutlet> for OutletResponse {
    fn from(outlet: FulfillmentOutlet) -> Self {
        OutletResponse {
            uuid: outlet.uuid.into_uuid(),
            name: outlet.name,
            district: outlet.district,
            distance_km: outlet.distance_km,
            express_eligible: outlet.express_eligible,
        }
    }
}

/// Quote Response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub(crate) struct QuoteResponse {
    /// ISO 4217 code of every amount
    pub currency: String,

    /// Regular lines at full price
    pub regular_subtotal: i64,

    /// Deposits payable now for pre-order lines
    pub pre_order_deposit: i64,

    /// What is payable before discounts
    pub subtotal: i64,

    pub card_discount: i64,
    pub coupon_code: Option<String>,
    pub coupon_discount: i64,

    /// Set when a coupon code was entered but not applied
    pub coupon_rejection: Option<CouponRejectionResponse>,

    pub gift_card_code: Option<String>,
    pub gift_card_discount: i64,
    pub points_applied: i64,
    pub points_discount: i64,

    /// Payable now, before shipping
    pub grand_total: i64,

    pub shipping_fee: i64,

    /// Payable now, including shipping
    pub total_amount: i64,

    /// Every line at full price
    pub full_order_value: i64,

    /// Left to pay on pre-order lines after the deposit
    pub pre_order_balance: i64,

    pub shipping: ShippingResponse,

    /// Absent when no single outlet can fulfill the cart
    pub outlet: Option<OutletResponse>,
}

impl From<CheckoutQuote> for QuoteResponse {
    fn from(quote: CheckoutQuote) -> Self {
        let breakdown = &quote.breakdown;

        QuoteResponse {
            currency: breakdown.currency().iso_alpha_code.to_string(),
            regular_subtotal: breakdown.regular_subtotal().to_minor_units(),
            pre_order_deposit: breakdown.pre_order_deposit_payable().to_minor_units(),
            subtotal: breakdown.subtotal().to_minor_units(),
            card_discount: breakdown.card_discount().to_minor_units(),
            coupon_code: breakdown.coupon_code().map(str::to_string),
            coupon_discount: breakdown.coupon_discount().to_minor_units(),
            coupon_rejection: breakdown.coupon_rejection().map(CouponRejectionResponse::from),
            gift_card_code: breakdown.gift_card_code().map(str::to_string),
            gift_card_discount: breakdown.gift_card_discount().to_minor_units(),
            points_applied: breakdown.points_applied(),
            points_discount: breakdown.points_discount().to_minor_units(),
            grand_total: breakdown.grand_total().to_minor_units(),
            shipping_fee: breakdown.shipping_fee().to_minor_units(),
            total_amount: breakdown.total_amount().to_minor_units(),
            full_order_value: breakdown.full_order_value().to_minor_units(),
            pre_order_balance: breakdown.pre_order_balance().to_minor_units(),
            shipping: ShippingResponse::from(&quote.shipping),
            outlet: quote.outlet.map(OutletResponse::from),
        }
    }
}

/// Applied coupon
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub(crate) struct CouponResponse {
    /// Normalized code
    pub code: String,

    /// Subtotal of the lines the coupon covers
    pub eligible_subtotal: i64,

    /// Discount before it is bounded by the rest of the checkout
    pub discount: i64,
}

impl From<AppliedCoupon> for CouponResponse {
    fn from(coupon: AppliedCoupon) -> Self {
        CouponResponse {
            code: coupon.code,
            eligible_subtotal: coupon.eligible_subtotal,
            discount: coupon.discount,
        }
    }
}
