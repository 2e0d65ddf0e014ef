//! Coupons
//!
//! Validation runs a fixed sequence of checks and stops at the first one that
//! fails, reporting it as a [`CouponRejection`]. Nothing here mutates the
//! coupon: usage is only counted when an order is committed.

use decimal_percentage::Percentage;
use jiff::Timestamp;
use rustc_hash::FxHashSet;
use rusty_money::{Money, iso::Currency};
use serde::Serialize;
use thiserror::Error;

use crate::{
    cart::{Cart, CartError, CartLine},
    discounts::{DiscountError, percent_of_minor},
    products::ProductId,
};

/// Why a coupon could not be applied to the cart.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum CouponRejection {
    /// No coupon matches the code.
    #[error("coupon code is invalid")]
    InvalidCode,

    /// The coupon's expiry date has passed.
    #[error("coupon has expired")]
    Expired,

    /// The coupon has been used as many times as allowed.
    #[error("coupon usage limit reached")]
    UsageLimitReached,

    /// No regular line in the cart is covered by the coupon.
    #[error("no items in the cart are eligible for this coupon")]
    NoEligibleItems,

    /// Eligible items do not reach the minimum spend.
    #[error("eligible subtotal {eligible} is below the minimum spend of {minimum}")]
    BelowMinimumSpend {
        /// Minimum spend in minor units
        minimum: i64,
        /// Eligible subtotal in minor units
        eligible: i64,
    },
}

impl CouponRejection {
    /// Stable machine-readable reason.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::InvalidCode => "invalid_code",
            Self::Expired => "expired",
            Self::UsageLimitReached => "usage_limit_reached",
            Self::NoEligibleItems => "no_eligible_items",
            Self::BelowMinimumSpend { .. } => "below_minimum_spend",
        }
    }
}

/// Errors that prevent a coupon from being evaluated at all.
#[derive(Debug, Error)]
pub enum CouponError {
    /// The coupon was evaluated and rejected.
    #[error(transparent)]
    Rejected(#[from] CouponRejection),

    /// Cart totals could not be computed.
    #[error(transparent)]
    Cart(#[from] CartError),

    /// Discount arithmetic failed.
    #[error(transparent)]
    Discount(#[from] DiscountError),
}

/// Coupon value
#[derive(Debug, Clone, Copy)]
pub enum CouponKind<'a> {
    /// Fixed amount off, capped at the eligible subtotal.
    Fixed(Money<'a, Currency>),

    /// Percentage of the eligible subtotal.
    Percentage(Percentage),
}

/// Coupon
#[derive(Debug, Clone)]
pub struct Coupon<'a> {
    code: String,
    kind: CouponKind<'a>,
    minimum_spend: Money<'a, Currency>,
    applicable_products: FxHashSet<ProductId>,
    expires_at: Timestamp,
    usage_limit: u32,
    used_count: u32,
}

impl<'a> Coupon<'a> {
    /// Create a coupon. The code is normalised with [`normalize_code`].
    pub fn new(
        code: &str,
        kind: CouponKind<'a>,
        minimum_spend: Money<'a, Currency>,
        expires_at: Timestamp,
        usage_limit: u32,
    ) -> Self {
        Self {
            code: normalize_code(code),
            kind,
            minimum_spend,
            applicable_products: FxHashSet::default(),
            expires_at,
            usage_limit,
            used_count: 0,
        }
    }

    /// Restrict the coupon to the given products. An empty set means every product.
    #[must_use]
    pub fn with_applicable_products(
        mut self,
        products: impl IntoIterator<Item = ProductId>,
    ) -> Self {
        self.applicable_products = products.into_iter().collect();
        self
    }

    /// Set how many times the coupon has been redeemed.
    #[must_use]
    pub fn with_used_count(mut self, used_count: u32) -> Self {
        self.used_count = used_count;
        self
    }

    /// Uppercased code
    pub fn code(&self) -> &str {
        &self.code
    }

    /// Coupon value
    pub fn kind(&self) -> &CouponKind<'a> {
        &self.kind
    }

    /// Minimum eligible spend
    pub fn minimum_spend(&self) -> &Money<'a, Currency> {
        &self.minimum_spend
    }

    /// Expiry timestamp
    pub fn expires_at(&self) -> Timestamp {
        self.expires_at
    }

    /// Maximum number of redemptions
    pub fn usage_limit(&self) -> u32 {
        self.usage_limit
    }

    /// Number of redemptions so far
    pub fn used_count(&self) -> u32 {
        self.used_count
    }

    /// Whether the coupon covers `line`. Pre-order lines are never covered.
    pub fn covers(&self, line: &CartLine<'_>) -> bool {
        !line.is_pre_order()
            && (self.applicable_products.is_empty()
                || self.applicable_products.contains(&line.product()))
    }

    /// Sum of the cart lines the coupon covers, in minor units.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::AmountOverflow`] if the sum does not fit.
    pub fn eligible_subtotal(&self, cart: &Cart<'_>) -> Result<i64, CartError> {
        cart.lines()
            .iter()
            .filter(|line| self.covers(line))
            .try_fold(0_i64, |acc, line| {
                acc.checked_add(line.total_minor()?)
                    .ok_or(CartError::AmountOverflow)
            })
    }

    /// Discount for an eligible subtotal, never more than the subtotal itself.
    ///
    /// # Errors
    ///
    /// Returns a [`DiscountError`] if the percentage cannot be applied.
    pub fn discount_for(&self, eligible_subtotal: i64) -> Result<i64, DiscountError> {
        let discount = match &self.kind {
            CouponKind::Fixed(amount) => amount.to_minor_units(),
            CouponKind::Percentage(percent) => percent_of_minor(percent, eligible_subtotal)?,
        };

        Ok(discount.clamp(0, eligible_subtotal.max(0)))
    }
}

/// A coupon that passed validation against a cart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppliedCoupon {
    /// Uppercased code
    pub code: String,

    /// Subtotal of the covered lines, in minor units
    pub eligible_subtotal: i64,

    /// Discount before any remainder clamping, in minor units
    pub discount: i64,
}

/// Validate `coupon` against `cart` at `now`.
///
/// `coupon` is the result of looking the code up; `None` means no coupon matched.
///
/// # Errors
///
/// - [`CouponError::Rejected`]: the first check that failed.
/// - [`CouponError::Cart`] or [`CouponError::Discount`]: totals could not be computed.
pub fn validate_coupon(
    coupon: Option<&Coupon<'_>>,
    cart: &Cart<'_>,
    now: Timestamp,
) -> Result<AppliedCoupon, CouponError> {
    let coupon = coupon.ok_or(CouponRejection::InvalidCode)?;

    if coupon.expires_at <= now {
        return Err(CouponRejection::Expired.into());
    }

    if coupon.used_count >= coupon.usage_limit {
        return Err(CouponRejection::UsageLimitReached.into());
    }

    if !cart.lines().iter().any(|line| coupon.covers(line)) {
        return Err(CouponRejection::NoEligibleItems.into());
    }

    let eligible_subtotal = coupon.eligible_subtotal(cart)?;
    let minimum = coupon.minimum_spend.to_minor_units();

    if eligible_subtotal < minimum {
        return Err(CouponRejection::BelowMinimumSpend {
            minimum,
            eligible: eligible_subtotal,
        }
        .into());
    }

    Ok(AppliedCoupon {
        code: coupon.code.clone(),
        eligible_subtotal,
        discount: coupon.discount_for(eligible_subtotal)?,
    })
}

/// Normalise a customer-entered coupon code for lookup.
pub fn normalize_code(code: &str) -> String {
    code.trim().to_uppercase()
}

#[cfg(test)]
mod tests {
    use jiff::ToSpan;
    use rusty_money::iso::BDT;
    use testresult::TestResult;
    use uuid::Uuid;

    use super::*;
    use crate::products::Sku;

    fn product(n: u128) -> ProductId {
        ProductId::from_uuid(Uuid::from_u128(n))
    }

    fn cart() -> Result<Cart<'static>, CartError> {
        Cart::with_lines(
            [
                CartLine::regular(
                    product(1),
                    Sku::from("SHIRT"),
                    "Shirt",
                    2,
                    Money::from_minor(30_000, BDT),
                ),
                CartLine::regular(
                    product(2),
                    Sku::from("MUG"),
                    "Mug",
                    1,
                    Money::from_minor(10_000, BDT),
                ),
                CartLine::pre_order(
                    product(3),
                    Sku::from("PHONE"),
                    "Phone",
                    1,
                    Money::from_minor(500_000, BDT),
                    None,
                ),
            ],
            BDT,
        )
    }

    fn fixed(amount: i64, minimum: i64) -> Coupon<'static> {
        Coupon::new(
            "save100",
            CouponKind::Fixed(Money::from_minor(amount, BDT)),
            Money::from_minor(minimum, BDT),
            Timestamp::now() + 24.hours(),
            10,
        )
    }

    #[test]
    fn codes_are_uppercased() {
        assert_eq!(fixed(100, 0).code(), "SAVE100");
        assert_eq!(normalize_code("  eid25 "), "EID25");
    }

    #[test]
    fn missing_coupon_is_invalid_code() -> TestResult {
        let result = validate_coupon(None, &cart()?, Timestamp::now());

        assert!(matches!(
            result,
            Err(CouponError::Rejected(CouponRejection::InvalidCode))
        ));

        Ok(())
    }

    #[test]
    fn expired_coupon_is_rejected_before_usage_limit() -> TestResult {
        let coupon = Coupon::new(
            "OLD",
            CouponKind::Fixed(Money::from_minor(100, BDT)),
            Money::from_minor(0, BDT),
            Timestamp::now() - 1.hour(),
            1,
        )
        .with_used_count(1);

        let result = validate_coupon(Some(&coupon), &cart()?, Timestamp::now());

        assert!(matches!(
            result,
            Err(CouponError::Rejected(CouponRejection::Expired))
        ));

        Ok(())
    }

    #[test]
    fn exhausted_coupon_is_rejected() -> TestResult {
        let coupon = fixed(100, 0).with_used_count(10);

        let result = validate_coupon(Some(&coupon), &cart()?, Timestamp::now());

        assert!(matches!(
            result,
            Err(CouponError::Rejected(CouponRejection::UsageLimitReached))
        ));

        Ok(())
    }

    #[test]
    fn coupon_for_pre_order_product_has_no_eligible_items() -> TestResult {
        let coupon = fixed(100, 0).with_applicable_products([product(3)]);

        let result = validate_coupon(Some(&coupon), &cart()?, Timestamp::now());

        assert!(matches!(
            result,
            Err(CouponError::Rejected(CouponRejection::NoEligibleItems))
        ));

        Ok(())
    }

    #[test]
    fn minimum_spend_uses_eligible_subtotal_only() -> TestResult {
        // Mug alone is 100.00, below the 500.00 minimum even though the cart is larger.
        let coupon = fixed(5_000, 50_000).with_applicable_products([product(2)]);

        let result = validate_coupon(Some(&coupon), &cart()?, Timestamp::now());

        assert!(matches!(
            result,
            Err(CouponError::Rejected(CouponRejection::BelowMinimumSpend {
                minimum: 50_000,
                eligible: 10_000,
            }))
        ));

        Ok(())
    }

    #[test]
    fn fixed_coupon_is_capped_at_eligible_subtotal() -> TestResult {
        let coupon = fixed(20_000, 0).with_applicable_products([product(2)]);

        let applied = validate_coupon(Some(&coupon), &cart()?, Timestamp::now())?;

        assert_eq!(applied.eligible_subtotal, 10_000);
        assert_eq!(applied.discount, 10_000);

        Ok(())
    }

    #[test]
    fn percentage_coupon_uses_regular_lines_only() -> TestResult {
        let coupon = Coupon::new(
            "TEN",
            CouponKind::Percentage(Percentage::from(0.1)),
            Money::from_minor(0, BDT),
            Timestamp::now() + 1.hour(),
            5,
        );

        let applied = validate_coupon(Some(&coupon), &cart()?, Timestamp::now())?;

        assert_eq!(applied.eligible_subtotal, 70_000);
        assert_eq!(applied.discount, 7_000);

        Ok(())
    }

    #[test]
    fn validating_twice_gives_the_same_discount() -> TestResult {
        let coupon = fixed(10_000, 50_000);
        let cart = cart()?;
        let now = Timestamp::now();

        let first = validate_coupon(Some(&coupon), &cart, now)?;
        let second = validate_coupon(Some(&coupon), &cart, now)?;

        assert_eq!(first, second);
        assert_eq!(coupon.used_count(), 0);

        Ok(())
    }
}
