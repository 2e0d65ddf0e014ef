//! Fixtures
//!
//! Checkout scenarios described in YAML: cart lines, outlets with their stock,
//! the customer and the discounts requested. Used by the integration tests.

use std::{fs, path::PathBuf};

use jiff::Timestamp;
use rusty_money::iso::Currency;
use serde::Deserialize;
use thiserror::Error;
use uuid::Uuid;

use crate::{
    cart::{Cart, CartError},
    channels::CheckoutChannel,
    fixtures::{cart::LineFixture, discounts::DiscountsFixture, outlets::OutletFixture},
    fulfillment::{Inventory, VariantStock},
    outlets::{GeoPoint, Outlet},
    pricing::DiscountContext,
    products::{ProductId, Sku},
};

pub mod cart;
pub mod discounts;
pub mod outlets;

pub use cart::{parse_percentage, parse_price};

/// Fixture Parsing Errors
#[derive(Debug, Error)]
pub enum FixtureError {
    /// IO error reading fixture files
    #[error("Failed to read fixture file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// Invalid price format
    #[error("Invalid price format: {0}")]
    InvalidPrice(String),

    /// Invalid percentage format
    #[error("Invalid percentage format: {0}")]
    InvalidPercentage(String),

    /// Unknown currency code
    #[error("Unknown currency code: {0}")]
    UnknownCurrency(String),

    /// Stock refers to a line that does not exist
    #[error("Line not found: {0}")]
    LineNotFound(String),

    /// Outlet key not found
    #[error("Outlet not found: {0}")]
    OutletNotFound(String),

    /// Currency mismatch between lines
    #[error("Currency mismatch: expected {0}, found {1}")]
    CurrencyMismatch(String, String),

    /// No lines in the scenario
    #[error("No lines in scenario; currency unknown")]
    NoLines,

    /// Cart creation error
    #[error("Failed to create cart: {0}")]
    Cart(#[from] CartError),
}

/// Customer section of a scenario
#[derive(Debug, Default, Deserialize)]
pub struct CustomerFixture {
    /// Latitude of the delivery address
    pub lat: Option<f64>,

    /// Longitude of the delivery address
    pub lng: Option<f64>,

    /// Delivery district
    pub district: Option<String>,

    /// Loyalty balance
    #[serde(default)]
    pub points: i64,
}

/// A checkout scenario as written in YAML
#[derive(Debug, Deserialize)]
pub struct ScenarioFixture {
    /// Channel the checkout comes from
    #[serde(default = "default_channel")]
    pub channel: CheckoutChannel,

    /// Cart lines in order
    pub lines: Vec<LineFixture>,

    /// Candidate outlets in directory order
    #[serde(default)]
    pub outlets: Vec<OutletFixture>,

    /// Customer
    #[serde(default)]
    pub customer: CustomerFixture,

    /// Requested discounts
    #[serde(default)]
    pub discounts: DiscountsFixture,
}

fn default_channel() -> CheckoutChannel {
    CheckoutChannel::Storefront
}

/// Fixture
#[derive(Debug)]
pub struct Fixture<'a> {
    scenario: ScenarioFixture,
    currency: &'static Currency,
    cart: Cart<'a>,
    outlets: Vec<Outlet>,
    inventory: Inventory,
}

impl<'a> Fixture<'a> {
    /// Load `./fixtures/scenarios/{name}.yml`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or describes an invalid cart.
    pub fn from_set(name: &str) -> Result<Self, FixtureError> {
        Self::from_path(
            PathBuf::from("./fixtures")
                .join("scenarios")
                .join(format!("{name}.yml")),
        )
    }

    /// Load a scenario file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or describes an invalid cart.
    pub fn from_path(path: impl Into<PathBuf>) -> Result<Self, FixtureError> {
        let contents = fs::read_to_string(path.into())?;

        Self::from_yaml(&contents)
    }

    /// Build a fixture from YAML text.
    ///
    /// # Errors
    ///
    /// Returns an error if the text cannot be parsed or describes an invalid cart.
    pub fn from_yaml(contents: &str) -> Result<Self, FixtureError> {
        let scenario: ScenarioFixture = serde_norway::from_str(contents)?;

        let currency = scenario.currency()?;

        let lines = scenario
            .lines
            .iter()
            .enumerate()
            .map(|(index, line)| line.to_line(product_id(index)))
            .collect::<Result<Vec<_>, _>>()?;

        let cart = Cart::with_lines(lines, currency)?;

        let outlets = scenario
            .outlets
            .iter()
            .enumerate()
            .map(|(index, outlet)| outlet.to_outlet(index))
            .collect();

        let inventory = scenario.inventory()?;

        Ok(Self {
            scenario,
            currency,
            cart,
            outlets,
            inventory,
        })
    }

    /// Scenario cart
    pub fn cart(&self) -> &Cart<'a> {
        &self.cart
    }

    /// Scenario outlets, in directory order
    pub fn outlets(&self) -> &[Outlet] {
        &self.outlets
    }

    /// Outlet with the given key
    ///
    /// # Errors
    ///
    /// Returns an error if no outlet has that key.
    pub fn outlet(&self, key: &str) -> Result<&Outlet, FixtureError> {
        self.scenario
            .outlets
            .iter()
            .zip(&self.outlets)
            .find(|(fixture, _)| fixture.key == key)
            .map(|(_, outlet)| outlet)
            .ok_or_else(|| FixtureError::OutletNotFound(key.to_string()))
    }

    /// Stock of every line at every outlet
    pub fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    /// Checkout channel
    pub fn channel(&self) -> CheckoutChannel {
        self.scenario.channel
    }

    /// Customer coordinates, when both are given
    pub fn customer_location(&self) -> Option<GeoPoint> {
        Some(GeoPoint::new(
            self.scenario.customer.lat?,
            self.scenario.customer.lng?,
        ))
    }

    /// Customer delivery district
    pub fn delivery_district(&self) -> Option<&str> {
        self.scenario.customer.district.as_deref()
    }

    /// Product id of the line with the given key
    ///
    /// # Errors
    ///
    /// Returns an error if no line has that key.
    pub fn product(&self, key: &str) -> Result<ProductId, FixtureError> {
        self.scenario.product(key)
    }

    /// Discount context for the scenario, evaluated at `now`.
    ///
    /// # Errors
    ///
    /// Returns an error if a price or percentage in the discounts section is invalid.
    pub fn context(&self, now: Timestamp) -> Result<DiscountContext<'a>, FixtureError> {
        self.scenario.discounts.to_context(
            &self.scenario,
            self.scenario.customer.points,
            self.currency,
            now,
        )
    }

    /// Currency of the scenario
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }
}

impl ScenarioFixture {
    fn currency(&self) -> Result<&'static Currency, FixtureError> {
        let mut currencies = self
            .lines
            .iter()
            .map(|line| parse_price(&line.price).map(|(_, currency)| currency));

        let first = currencies.next().ok_or(FixtureError::NoLines)??;

        for currency in currencies {
            let currency = currency?;

            if currency != first {
                return Err(FixtureError::CurrencyMismatch(
                    first.iso_alpha_code.to_string(),
                    currency.iso_alpha_code.to_string(),
                ));
            }
        }

        Ok(first)
    }

    fn line(&self, key: &str) -> Result<(usize, &LineFixture), FixtureError> {
        self.lines
            .iter()
            .enumerate()
            .find(|(_, line)| line.key == key)
            .ok_or_else(|| FixtureError::LineNotFound(key.to_string()))
    }

    pub(crate) fn product(&self, key: &str) -> Result<ProductId, FixtureError> {
        self.line(key).map(|(index, _)| product_id(index))
    }

    fn inventory(&self) -> Result<Inventory, FixtureError> {
        let mut inventory = Inventory::default();

        for (index, line) in self.lines.iter().enumerate() {
            let mut stock = VariantStock::default();

            for (outlet_index, outlet) in self.outlets.iter().enumerate() {
                let on_hand = outlet.stock.get(&line.key).copied().unwrap_or_default();

                stock.stock += on_hand;
                stock
                    .outlet_stocks
                    .insert(outlets::outlet_id(outlet_index), on_hand);
            }

            inventory.insert(product_id(index), Sku::new(line.sku()), stock);
        }

        for outlet in &self.outlets {
            if let Some(key) = outlet.stock.keys().find(|key| self.line(key).is_err()) {
                return Err(FixtureError::LineNotFound(key.clone()));
            }
        }

        Ok(inventory)
    }
}

fn product_id(index: usize) -> ProductId {
    ProductId::from_uuid(Uuid::from_u128(index as u128 + 1))
}
