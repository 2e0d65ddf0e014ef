//! Products

use std::fmt::{Display, Formatter, Result as FmtResult};

use decimal_percentage::Percentage;
use rusty_money::{Money, iso::Currency};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::discounts::{DiscountError, percent_of_minor};

/// Product identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(Uuid);

impl ProductId {
    /// Wrap a raw UUID.
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Unwrap into the raw UUID.
    #[must_use]
    pub const fn into_uuid(self) -> Uuid {
        self.0
    }
}

impl Display for ProductId {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        Display::fmt(&self.0, f)
    }
}

/// Variant stock keeping unit, unique within its product.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Sku(String);

impl Sku {
    /// Create a SKU from any string-like value.
    pub fn new(sku: impl Into<String>) -> Self {
        Self(sku.into())
    }

    /// Borrow the SKU as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for Sku {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(&self.0)
    }
}

impl From<&str> for Sku {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// How much of a pre-order line is payable at checkout.
#[derive(Debug, Clone, Copy)]
pub enum DepositRule<'a> {
    /// A share of the line total (e.g. "20% now").
    Percentage(Percentage),

    /// A fixed amount per ordered unit.
    PerUnit(Money<'a, Currency>),
}

impl DepositRule<'_> {
    /// Deposit payable now for a pre-order line, in minor units.
    ///
    /// The deposit never exceeds the line total.
    ///
    /// # Errors
    ///
    /// Returns a [`DiscountError`] if the percentage cannot be applied to the line total.
    pub fn payable_minor(&self, line_total: i64, quantity: u32) -> Result<i64, DiscountError> {
        let deposit = match self {
            Self::Percentage(percent) => percent_of_minor(percent, line_total)?,
            Self::PerUnit(amount) => amount
                .to_minor_units()
                .checked_mul(i64::from(quantity))
                .ok_or(DiscountError::PercentConversion)?,
        };

        Ok(deposit.clamp(0, line_total))
    }
}
