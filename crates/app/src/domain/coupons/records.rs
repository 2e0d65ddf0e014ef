//! Coupon Records

use jiff::Timestamp;
use rusty_money::{Money, iso::Currency};
use storefront::{
    coupons::{Coupon, CouponKind},
    discounts::percentage_from_basis_points,
    products::ProductId,
};

use crate::{domain::catalog::records::ProductUuid, uuids::TypedUuid};

/// Coupon UUID
pub type CouponUuid = TypedUuid<CouponRecord>;

/// Coupon value as stored: minor units or basis points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CouponValue {
    Fixed { amount: i64 },
    Percentage { basis_points: u32 },
}

/// Coupon Record
#[derive(Debug, Clone, PartialEq)]
pub struct CouponRecord {
    pub uuid: CouponUuid,
    pub code: String,
    pub value: CouponValue,
    pub minimum_spend: i64,
    pub expires_at: Timestamp,
    pub usage_limit: u32,
    pub used_count: u32,
    pub products: Vec<ProductUuid>,
}

impl CouponRecord {
    /// The coupon as the validator sees it.
    #[must_use]
    pub fn to_coupon(&self, currency: &'static Currency) -> Coupon<'static> {
        let kind = match self.value {
            CouponValue::Fixed { amount } => CouponKind::Fixed(Money::from_minor(amount, currency)),
            CouponValue::Percentage { basis_points } => {
                CouponKind::Percentage(percentage_from_basis_points(basis_points))
            }
        };

        Coupon::new(
            &self.code,
            kind,
            Money::from_minor(self.minimum_spend, currency),
            self.expires_at,
            self.usage_limit,
        )
        .with_applicable_products(
            self.products
                .iter()
                .map(|product| ProductId::from_uuid(product.into_uuid())),
        )
        .with_used_count(self.used_count)
    }
}
