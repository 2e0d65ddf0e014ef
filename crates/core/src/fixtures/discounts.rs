//! Discount fixtures

use jiff::{Timestamp, ToSpan};
use rusty_money::{Money, iso::Currency};
use serde::Deserialize;

use crate::{
    coupons::{Coupon, CouponKind},
    fixtures::{FixtureError, ScenarioFixture, parse_percentage, parse_price},
    gift_cards::GiftCard,
    pricing::DiscountContext,
};

/// Coupon fixture
#[derive(Debug, Deserialize)]
pub struct CouponFixture {
    /// Code
    pub code: String,

    /// Fixed amount off (e.g., "100.00 BDT")
    pub fixed: Option<String>,

    /// Percentage off (e.g., "10%")
    pub percentage: Option<String>,

    /// Minimum eligible spend
    pub minimum_spend: Option<String>,

    /// Line keys the coupon is limited to; empty means all
    #[serde(default)]
    pub products: Vec<String>,

    /// Usage limit
    #[serde(default = "default_usage_limit")]
    pub usage_limit: u32,

    /// Redemptions so far
    #[serde(default)]
    pub used_count: u32,

    /// Whether the coupon expired an hour ago instead of expiring in a day
    #[serde(default)]
    pub expired: bool,
}

fn default_usage_limit() -> u32 {
    100
}

/// Gift card fixture
#[derive(Debug, Deserialize)]
pub struct GiftCardFixture {
    /// Code
    pub code: String,

    /// Balance (e.g., "200.00 BDT")
    pub balance: String,
}

/// Discounts requested in a scenario
#[derive(Debug, Default, Deserialize)]
pub struct DiscountsFixture {
    /// Card-tier promotion
    pub card_promo: Option<String>,

    /// Code the customer typed
    pub coupon_code: Option<String>,

    /// Coupon found for the code; absent means lookup failed
    pub coupon: Option<CouponFixture>,

    /// Points requested
    #[serde(default)]
    pub points: i64,

    /// Value of one point (e.g., "1.00 BDT")
    pub point_value: Option<String>,

    /// Gift card
    pub gift_card: Option<GiftCardFixture>,
}

impl DiscountsFixture {
    pub(crate) fn to_context<'a>(
        &self,
        scenario: &ScenarioFixture,
        available_points: i64,
        currency: &'static Currency,
        now: Timestamp,
    ) -> Result<DiscountContext<'a>, FixtureError> {
        let point_value = match &self.point_value {
            Some(value) => parse_price(value)?.0,
            None => 100,
        };

        let mut context =
            DiscountContext::new(point_value, now).with_points(self.points, available_points);

        if let Some(percent) = &self.card_promo {
            context = context.with_card_promo(parse_percentage(percent)?);
        }

        let coupon = self
            .coupon
            .as_ref()
            .map(|coupon| coupon.to_coupon(scenario, currency, now))
            .transpose()?;

        let code = self
            .coupon_code
            .clone()
            .or_else(|| coupon.as_ref().map(|coupon| coupon.code().to_string()));

        if let Some(code) = code {
            context = context.with_coupon(&code, coupon);
        }

        if let Some(card) = &self.gift_card {
            let (balance, card_currency) = parse_price(&card.balance)?;

            context = context.with_gift_card(GiftCard::new(
                &card.code,
                Money::from_minor(balance, card_currency),
                None,
            ));
        }

        Ok(context)
    }
}

impl CouponFixture {
    fn to_coupon<'a>(
        &self,
        scenario: &ScenarioFixture,
        currency: &'static Currency,
        now: Timestamp,
    ) -> Result<Coupon<'a>, FixtureError> {
        let kind = match (&self.fixed, &self.percentage) {
            (Some(amount), _) => {
                let (minor, amount_currency) = parse_price(amount)?;

                CouponKind::Fixed(Money::from_minor(minor, amount_currency))
            }
            (None, Some(percent)) => CouponKind::Percentage(parse_percentage(percent)?),
            (None, None) => {
                return Err(FixtureError::InvalidPrice(format!(
                    "coupon {} has neither a fixed nor a percentage value",
                    self.code
                )));
            }
        };

        let minimum_spend = match &self.minimum_spend {
            Some(amount) => parse_price(amount)?.0,
            None => 0,
        };

        let expires_at = if self.expired {
            now - 1.hour()
        } else {
            now + 24.hours()
        };

        let products = self
            .products
            .iter()
            .map(|key| scenario.product(key))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Coupon::new(
            &self.code,
            kind,
            Money::from_minor(minimum_spend, currency),
            expires_at,
            self.usage_limit,
        )
        .with_applicable_products(products)
        .with_used_count(self.used_count))
    }
}
