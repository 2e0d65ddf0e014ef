//! Cart line fixtures

use decimal_percentage::Percentage;
use rust_decimal::{Decimal, prelude::ToPrimitive};
use rusty_money::{
    Money,
    iso::{BDT, Currency, EUR, GBP, USD},
};
use serde::Deserialize;

use crate::{
    cart::CartLine,
    fixtures::FixtureError,
    products::{DepositRule, ProductId, Sku},
};

/// Cart line fixture
#[derive(Debug, Deserialize)]
pub struct LineFixture {
    /// Key used by outlet stock and coupon product lists
    pub key: String,

    /// SKU; defaults to the uppercased key
    pub sku: Option<String>,

    /// Product name
    pub name: String,

    /// Unit price (e.g., "499.00 BDT")
    pub price: String,

    /// Quantity
    #[serde(default = "default_quantity")]
    pub quantity: u32,

    /// Whether the line is a pre-order
    #[serde(default)]
    pub pre_order: bool,

    /// Deposit payable now for pre-orders, either "20%" or an amount per unit
    pub deposit: Option<String>,
}

fn default_quantity() -> u32 {
    1
}

impl LineFixture {
    /// SKU of the line
    pub fn sku(&self) -> String {
        self.sku.clone().unwrap_or_else(|| self.key.to_uppercase())
    }

    /// Build the cart line for `product`.
    ///
    /// # Errors
    ///
    /// Returns an error if the price or deposit cannot be parsed.
    pub fn to_line<'a>(&self, product: ProductId) -> Result<CartLine<'a>, FixtureError> {
        let (minor_units, currency) = parse_price(&self.price)?;
        let price = Money::from_minor(minor_units, currency);
        let sku = Sku::new(self.sku());

        if !self.pre_order {
            return Ok(CartLine::regular(
                product,
                sku,
                self.name.clone(),
                self.quantity,
                price,
            ));
        }

        let deposit = self
            .deposit
            .as_deref()
            .map(parse_deposit)
            .transpose()?;

        Ok(CartLine::pre_order(
            product,
            sku,
            self.name.clone(),
            self.quantity,
            price,
            deposit,
        ))
    }
}

fn parse_deposit<'a>(s: &str) -> Result<DepositRule<'a>, FixtureError> {
    if s.trim().ends_with('%') {
        return parse_percentage(s).map(DepositRule::Percentage);
    }

    let (minor_units, currency) = parse_price(s)?;

    Ok(DepositRule::PerUnit(Money::from_minor(minor_units, currency)))
}

/// Parse price string (e.g., "2.99 BDT") into minor units and currency
///
/// # Errors
///
/// Returns an error if the string is not in the format "AMOUNT CURRENCY",
/// if the amount cannot be parsed as a decimal, or if the currency code
/// is not recognized.
pub fn parse_price(s: &str) -> Result<(i64, &'static Currency), FixtureError> {
    let parts: Vec<&str> = s.split_whitespace().collect();

    if parts.len() != 2 {
        return Err(FixtureError::InvalidPrice(format!(
            "Expected format 'AMOUNT CURRENCY', got: {s}"
        )));
    }

    let amount = parts
        .first()
        .ok_or_else(|| FixtureError::InvalidPrice(s.to_string()))?
        .parse::<Decimal>()
        .map_err(|_err| FixtureError::InvalidPrice(s.to_string()))?;

    let minor_units = amount
        .checked_mul(Decimal::new(100, 0))
        .and_then(|value| value.round_dp(0).to_i64())
        .ok_or_else(|| FixtureError::InvalidPrice(s.to_string()))?;

    let currency_code = parts
        .get(1)
        .ok_or_else(|| FixtureError::InvalidPrice(s.to_string()))?;

    let currency = match *currency_code {
        "BDT" => BDT,
        "GBP" => GBP,
        "USD" => USD,
        "EUR" => EUR,
        other => return Err(FixtureError::UnknownCurrency(other.to_string())),
    };

    Ok((minor_units, currency))
}

/// Parse percentage string (e.g., "15%" or "0.15") into a `Percentage`
///
/// # Errors
///
/// Returns an error if the string cannot be parsed as a decimal.
pub fn parse_percentage(s: &str) -> Result<Percentage, FixtureError> {
    let trimmed = s.trim();

    let (value, scale) = match trimmed.strip_suffix('%') {
        Some(percent) => (percent.trim(), Decimal::ONE_HUNDRED),
        None => (trimmed, Decimal::ONE),
    };

    let value = value
        .parse::<Decimal>()
        .map_err(|_err| FixtureError::InvalidPercentage(s.to_string()))?;

    Ok(Percentage::from(value / scale))
}
