//! Discount utilities
//!
//! Minor-unit helpers shared by the pricing stages, coupons and deposit rules.

use decimal_percentage::Percentage;
use rust_decimal::{
    Decimal, RoundingStrategy,
    prelude::{FromPrimitive, ToPrimitive},
};
use rusty_money::MoneyError;
use thiserror::Error;

/// Errors specific to discount calculations.
#[derive(Debug, Error)]
pub enum DiscountError {
    /// Percentage calculation could not be safely converted.
    #[error("percentage conversion overflowed or was not finite")]
    PercentConversion,

    /// Wrapped money arithmetic or currency mismatch error.
    #[error(transparent)]
    Money(#[from] MoneyError),
}

/// Calculate the discount amount in minor units based on a percentage and a minor unit amount.
///
/// # Errors
///
/// Returns an error if:
/// - The percentage calculation overflows or cannot be safely represented (`DiscountError::PercentConversion`).
pub fn percent_of_minor(percent: &Percentage, minor: i64) -> Result<i64, DiscountError> {
    let minor = Decimal::from_i64(minor).ok_or(DiscountError::PercentConversion)?;

    ((*percent) * Decimal::ONE) // decimal_percentage crate doesn't actually expose the underlying Decimal
        .checked_mul(minor)
        .ok_or(DiscountError::PercentConversion)?
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        .ok_or(DiscountError::PercentConversion)
}

/// Build a percentage from basis points (`1250` is 12.50%).
pub fn percentage_from_basis_points(basis_points: u32) -> Percentage {
    Percentage::from(Decimal::from(basis_points) / Decimal::from(10_000))
}

/// Convert a percentage back into whole basis points, rounding half away from zero.
///
/// # Errors
///
/// Returns [`DiscountError::PercentConversion`] for negative or out of range values.
pub fn percentage_to_basis_points(percent: &Percentage) -> Result<u32, DiscountError> {
    ((*percent) * Decimal::ONE)
        .checked_mul(Decimal::from(10_000))
        .ok_or(DiscountError::PercentConversion)?
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_u32()
        .ok_or(DiscountError::PercentConversion)
}

/// Clamp a stage discount so it never exceeds what is left to pay.
pub fn clamp_to_remainder(discount: i64, remainder: i64) -> i64 {
    discount.clamp(0, remainder.max(0))
}
