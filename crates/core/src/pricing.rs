//! Pricing
//!
//! [`compute_totals`] applies the discount stages in a fixed order:
//!
//! 1. card-tier promotion over the regular subtotal
//! 2. coupon over the lines it covers
//! 3. gift card
//! 4. loyalty points
//!
//! Each stage is clamped to what the previous stages left to pay, so no stage
//! can push the payable amount below zero. Card and coupon discounts only ever
//! touch regular lines; gift cards and points may also cover the pre-order
//! deposit payable today.

use decimal_percentage::Percentage;
use jiff::Timestamp;
use rust_decimal::Decimal;
use rusty_money::{Money, iso::Currency};
use thiserror::Error;

use crate::{
    cart::{Cart, CartError},
    coupons::{Coupon, CouponError, CouponRejection, normalize_code, validate_coupon},
    discounts::{DiscountError, clamp_to_remainder, percent_of_minor},
    gift_cards::{GiftCard, GiftCardError},
    loyalty::{LoyaltyError, redeem_points},
};

/// Errors that stop a cart from being priced.
#[derive(Debug, Error)]
pub enum PricingError {
    /// Cart totals failed.
    #[error(transparent)]
    Cart(#[from] CartError),

    /// Percentage arithmetic failed.
    #[error(transparent)]
    Discount(#[from] DiscountError),

    /// The coupon could not be evaluated.
    #[error(transparent)]
    Coupon(#[from] CouponError),

    /// Points could not be converted.
    #[error(transparent)]
    Loyalty(#[from] LoyaltyError),

    /// The gift card cannot be used.
    #[error(transparent)]
    GiftCard(#[from] GiftCardError),

    /// Card promotions must be between 0% and 100%.
    #[error("card promotion must be between 0% and 100%")]
    InvalidCardPromo,

    /// Amounts left the representable range.
    #[error("pricing amount overflowed")]
    Overflow,
}

/// Inputs for one pricing pass, rebuilt for every quote.
#[derive(Debug, Clone)]
pub struct DiscountContext<'a> {
    card_promo: Option<Percentage>,
    coupon_code: Option<String>,
    coupon: Option<Coupon<'a>>,
    points_requested: i64,
    points_available: i64,
    point_value: i64,
    gift_card: Option<GiftCard<'a>>,
    now: Timestamp,
}

impl<'a> DiscountContext<'a> {
    /// Context with no discounts, where one loyalty point is worth `point_value` minor units.
    pub fn new(point_value: i64, now: Timestamp) -> Self {
        Self {
            card_promo: None,
            coupon_code: None,
            coupon: None,
            points_requested: 0,
            points_available: 0,
            point_value,
            gift_card: None,
            now,
        }
    }

    /// Apply a card-tier promotion.
    #[must_use]
    pub fn with_card_promo(mut self, percent: Percentage) -> Self {
        self.card_promo = Some(percent);
        self
    }

    /// Apply the coupon the customer entered. `found` is `None` when lookup matched nothing.
    #[must_use]
    pub fn with_coupon(mut self, code: &str, found: Option<Coupon<'a>>) -> Self {
        self.coupon_code = Some(normalize_code(code));
        self.coupon = found;
        self
    }

    /// Redeem up to `requested` of the customer's `available` points.
    #[must_use]
    pub fn with_points(mut self, requested: i64, available: i64) -> Self {
        self.points_requested = requested;
        self.points_available = available;
        self
    }

    /// Apply a gift card.
    #[must_use]
    pub fn with_gift_card(mut self, gift_card: GiftCard<'a>) -> Self {
        self.gift_card = Some(gift_card);
        self
    }

    /// Coupon code entered, if any.
    pub fn coupon_code(&self) -> Option<&str> {
        self.coupon_code.as_deref()
    }

    /// Minor units per loyalty point.
    pub fn point_value(&self) -> i64 {
        self.point_value
    }
}

/// Outcome of a pricing pass.
#[derive(Debug, Clone, PartialEq)]
pub struct PricingBreakdown {
    currency: &'static Currency,
    regular_subtotal: i64,
    pre_order_subtotal: i64,
    pre_order_deposit_payable: i64,
    card_discount: i64,
    coupon_discount: i64,
    coupon_code: Option<String>,
    coupon_rejection: Option<CouponRejection>,
    gift_card_code: Option<String>,
    gift_card_discount: i64,
    points_requested: i64,
    points_applied: i64,
    points_discount: i64,
    grand_total: i64,
    shipping_fee: i64,
}

impl PricingBreakdown {
    fn money<'a>(&self, minor: i64) -> Money<'a, Currency> {
        Money::from_minor(minor, self.currency)
    }

    /// Currency every amount is expressed in.
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }

    /// Sum of regular lines.
    pub fn regular_subtotal<'a>(&self) -> Money<'a, Currency> {
        self.money(self.regular_subtotal)
    }

    /// Sum of pre-order lines at full price.
    pub fn pre_order_subtotal<'a>(&self) -> Money<'a, Currency> {
        self.money(self.pre_order_subtotal)
    }

    /// What pre-order lines require today.
    pub fn pre_order_deposit_payable<'a>(&self) -> Money<'a, Currency> {
        self.money(self.pre_order_deposit_payable)
    }

    /// Amount discounts are taken from: regular subtotal plus deposit payable.
    pub fn subtotal<'a>(&self) -> Money<'a, Currency> {
        self.money(
            self.regular_subtotal
                .saturating_add(self.pre_order_deposit_payable),
        )
    }

    /// Card-tier discount.
    pub fn card_discount<'a>(&self) -> Money<'a, Currency> {
        self.money(self.card_discount)
    }

    /// Coupon discount.
    pub fn coupon_discount<'a>(&self) -> Money<'a, Currency> {
        self.money(self.coupon_discount)
    }

    /// Code of the applied coupon, if it was accepted.
    pub fn coupon_code(&self) -> Option<&str> {
        self.coupon_code.as_deref()
    }

    /// Why the entered coupon was not applied.
    pub fn coupon_rejection(&self) -> Option<&CouponRejection> {
        self.coupon_rejection.as_ref()
    }

    /// Code of the applied gift card.
    pub fn gift_card_code(&self) -> Option<&str> {
        self.gift_card_code.as_deref()
    }

    /// Gift card credit.
    pub fn gift_card_discount<'a>(&self) -> Money<'a, Currency> {
        self.money(self.gift_card_discount)
    }

    /// Points the customer asked for.
    pub fn points_requested(&self) -> i64 {
        self.points_requested
    }

    /// Points actually applied, after clamping.
    pub fn points_applied(&self) -> i64 {
        self.points_applied
    }

    /// Loyalty points discount.
    pub fn points_discount<'a>(&self) -> Money<'a, Currency> {
        self.money(self.points_discount)
    }

    /// Payable today before shipping.
    pub fn grand_total<'a>(&self) -> Money<'a, Currency> {
        self.money(self.grand_total)
    }

    /// Regular subtotal plus the full pre-order value.
    pub fn full_order_value<'a>(&self) -> Money<'a, Currency> {
        self.money(self.regular_subtotal.saturating_add(self.pre_order_subtotal))
    }

    /// Pre-order value still owed after the deposit.
    pub fn pre_order_balance<'a>(&self) -> Money<'a, Currency> {
        self.money(self.pre_order_subtotal - self.pre_order_deposit_payable)
    }

    /// Shipping fee added on top of the grand total.
    pub fn shipping_fee<'a>(&self) -> Money<'a, Currency> {
        self.money(self.shipping_fee)
    }

    /// Grand total plus shipping.
    pub fn total_amount<'a>(&self) -> Money<'a, Currency> {
        self.money(self.grand_total.saturating_add(self.shipping_fee))
    }

    /// Set the shipping fee.
    #[must_use]
    pub fn with_shipping(mut self, fee: &Money<'_, Currency>) -> Self {
        self.shipping_fee = fee.to_minor_units().max(0);
        self
    }
}

/// Price `cart` under `context`.
///
/// A rejected coupon does not fail the pass: its discount is zero and the
/// reason is reported through [`PricingBreakdown::coupon_rejection`].
///
/// # Errors
///
/// Returns a [`PricingError`] if totals overflow, the card promotion is out of
/// range, the gift card is unusable or points cannot be converted.
pub fn compute_totals(
    cart: &Cart<'_>,
    context: &DiscountContext<'_>,
) -> Result<PricingBreakdown, PricingError> {
    let regular_subtotal = cart.regular_subtotal()?.to_minor_units();
    let pre_order_subtotal = cart.pre_order_subtotal()?.to_minor_units();
    let pre_order_deposit_payable = cart.pre_order_deposit_payable()?.to_minor_units();

    // Stage 1: card promo, regular lines only.
    let card_discount = match &context.card_promo {
        Some(percent) => {
            let fraction = (*percent) * Decimal::ONE;

            if fraction < Decimal::ZERO || fraction > Decimal::ONE {
                return Err(PricingError::InvalidCardPromo);
            }

            clamp_to_remainder(percent_of_minor(percent, regular_subtotal)?, regular_subtotal)
        }
        None => 0,
    };

    let mut regular_remaining = regular_subtotal - card_discount;

    // Stage 2: coupon, based on the eligible subtotal.
    let mut coupon_discount = 0;
    let mut coupon_code = None;
    let mut coupon_rejection = None;

    if context.coupon_code.is_some() {
        match validate_coupon(context.coupon.as_ref(), cart, context.now) {
            Ok(applied) => {
                coupon_discount = clamp_to_remainder(applied.discount, regular_remaining);
                coupon_code = Some(applied.code);
            }
            Err(CouponError::Rejected(rejection)) => coupon_rejection = Some(rejection),
            Err(err) => return Err(err.into()),
        }
    }

    regular_remaining -= coupon_discount;

    let mut remaining = regular_remaining
        .checked_add(pre_order_deposit_payable)
        .ok_or(PricingError::Overflow)?;

    // Stage 3: gift card.
    let (gift_card_code, gift_card_discount) = match &context.gift_card {
        Some(card) => {
            card.ensure_usable(context.now)?;

            (Some(card.code().to_string()), card.credit_against(remaining))
        }
        None => (None, 0),
    };

    remaining -= gift_card_discount;

    // Stage 4: loyalty points.
    let redemption = redeem_points(
        context.points_requested,
        context.points_available,
        context.point_value,
        remaining,
    )?;

    remaining -= redemption.discount;

    Ok(PricingBreakdown {
        currency: cart.currency(),
        regular_subtotal,
        pre_order_subtotal,
        pre_order_deposit_payable,
        card_discount,
        coupon_discount,
        coupon_code,
        coupon_rejection,
        gift_card_code,
        gift_card_discount,
        points_requested: redemption.requested,
        points_applied: redemption.points_applied,
        points_discount: redemption.discount,
        grand_total: remaining.max(0),
        shipping_fee: 0,
    })
}

#[cfg(test)]
mod tests {
    use jiff::ToSpan;
    use rusty_money::iso::BDT;
    use testresult::TestResult;
    use uuid::Uuid;

    use super::*;
    use crate::{
        cart::CartLine,
        coupons::CouponKind,
        products::{DepositRule, ProductId, Sku},
    };

    fn bdt(minor: i64) -> Money<'static, Currency> {
        Money::from_minor(minor, BDT)
    }

    fn regular(n: u128, price: i64, quantity: u32) -> CartLine<'static> {
        CartLine::regular(
            ProductId::from_uuid(Uuid::from_u128(n)),
            Sku::new(format!("SKU-{n}")),
            format!("Product {n}"),
            quantity,
            bdt(price),
        )
    }

    fn pre_order(n: u128, price: i64, deposit: Option<DepositRule<'static>>) -> CartLine<'static> {
        CartLine::pre_order(
            ProductId::from_uuid(Uuid::from_u128(n)),
            Sku::new(format!("SKU-{n}")),
            format!("Product {n}"),
            1,
            bdt(price),
            deposit,
        )
    }

    fn context() -> DiscountContext<'static> {
        DiscountContext::new(100, Timestamp::now())
    }

    fn fixed_coupon(amount: i64, minimum: i64) -> Coupon<'static> {
        Coupon::new(
            "FLAT",
            CouponKind::Fixed(bdt(amount)),
            bdt(minimum),
            Timestamp::now() + 1.hour(),
            100,
        )
    }

    #[test]
    fn no_discounts_prices_regular_plus_deposit() -> TestResult {
        let cart = Cart::with_lines(
            [
                regular(1, 50_000, 2),
                pre_order(2, 100_000, Some(DepositRule::Percentage(Percentage::from(0.1)))),
            ],
            BDT,
        )?;

        let breakdown = compute_totals(&cart, &context())?;

        assert_eq!(breakdown.subtotal(), bdt(110_000));
        assert_eq!(breakdown.grand_total(), bdt(110_000));
        assert_eq!(breakdown.full_order_value(), bdt(200_000));
        assert_eq!(breakdown.pre_order_balance(), bdt(90_000));

        Ok(())
    }

    #[test]
    fn card_and_fixed_coupon_stack_on_the_eligible_base() -> TestResult {
        let cart = Cart::with_lines([regular(1, 100_000, 1)], BDT)?;
        let context = context()
            .with_card_promo(Percentage::from(0.1))
            .with_coupon("flat", Some(fixed_coupon(10_000, 50_000)));

        let breakdown = compute_totals(&cart, &context)?;

        assert_eq!(breakdown.card_discount(), bdt(10_000));
        assert_eq!(breakdown.coupon_discount(), bdt(10_000));
        assert_eq!(breakdown.grand_total(), bdt(80_000));
        assert_eq!(breakdown.coupon_code(), Some("FLAT"));

        Ok(())
    }

    #[test]
    fn coupon_is_clamped_to_what_the_card_left() -> TestResult {
        let cart = Cart::with_lines([regular(1, 10_000, 1)], BDT)?;
        let context = context()
            .with_card_promo(Percentage::from(0.5))
            .with_coupon("flat", Some(fixed_coupon(8_000, 0)));

        let breakdown = compute_totals(&cart, &context)?;

        assert_eq!(breakdown.card_discount(), bdt(5_000));
        assert_eq!(breakdown.coupon_discount(), bdt(5_000));
        assert_eq!(breakdown.grand_total(), bdt(0));

        Ok(())
    }

    #[test]
    fn rejected_coupon_is_reported_not_raised() -> TestResult {
        let cart = Cart::with_lines([regular(1, 10_000, 1)], BDT)?;
        let context = context().with_coupon("nope", None);

        let breakdown = compute_totals(&cart, &context)?;

        assert_eq!(breakdown.coupon_discount(), bdt(0));
        assert_eq!(
            breakdown.coupon_rejection(),
            Some(&CouponRejection::InvalidCode)
        );

        Ok(())
    }

    #[test]
    fn pre_order_only_cart_gets_no_card_or_coupon_discount() -> TestResult {
        let cart = Cart::with_lines([pre_order(1, 100_000, None)], BDT)?;
        let context = context()
            .with_card_promo(Percentage::from(0.2))
            .with_coupon("flat", Some(fixed_coupon(1_000, 0)));

        let breakdown = compute_totals(&cart, &context)?;

        assert_eq!(breakdown.card_discount(), bdt(0));
        assert_eq!(breakdown.coupon_discount(), bdt(0));
        assert_eq!(
            breakdown.coupon_rejection(),
            Some(&CouponRejection::NoEligibleItems)
        );
        assert_eq!(breakdown.grand_total(), bdt(100_000));

        Ok(())
    }

    #[test]
    fn gift_card_and_points_cover_the_deposit() -> TestResult {
        let cart = Cart::with_lines(
            [pre_order(1, 100_000, Some(DepositRule::PerUnit(bdt(20_000))))],
            BDT,
        )?;
        let context = context()
            .with_gift_card(GiftCard::new("gift", bdt(15_000), None))
            .with_points(1_000, 1_000);

        let breakdown = compute_totals(&cart, &context)?;

        assert_eq!(breakdown.gift_card_discount(), bdt(15_000));
        assert_eq!(breakdown.points_applied(), 50);
        assert_eq!(breakdown.points_discount(), bdt(5_000));
        assert_eq!(breakdown.grand_total(), bdt(0));

        Ok(())
    }

    #[test]
    fn points_clamp_reports_the_usable_count() -> TestResult {
        let cart = Cart::with_lines([regular(1, 10_000, 1)], BDT)?;
        let context = context().with_points(500, 300);

        let breakdown = compute_totals(&cart, &context)?;

        assert_eq!(breakdown.points_requested(), 500);
        assert_eq!(breakdown.points_applied(), 100);
        assert_eq!(breakdown.grand_total(), bdt(0));

        Ok(())
    }

    #[test]
    fn shipping_is_added_after_discounts() -> TestResult {
        let cart = Cart::with_lines([regular(1, 10_000, 1)], BDT)?;
        let context = context().with_card_promo(Percentage::from(1.0));

        let breakdown = compute_totals(&cart, &context)?.with_shipping(&bdt(6_000));

        assert_eq!(breakdown.grand_total(), bdt(0));
        assert_eq!(breakdown.total_amount(), bdt(6_000));

        Ok(())
    }

    #[test]
    fn card_promo_above_one_hundred_percent_is_rejected() -> TestResult {
        let cart = Cart::with_lines([regular(1, 10_000, 1)], BDT)?;
        let context = context().with_card_promo(Percentage::from(1.5));

        let result = compute_totals(&cart, &context);

        assert!(matches!(result, Err(PricingError::InvalidCardPromo)));

        Ok(())
    }
}
