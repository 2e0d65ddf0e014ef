//! Loyalty points

use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::customers::CustomerId;

/// Loyalty errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LoyaltyError {
    /// A point must be worth at least one minor unit.
    #[error("point value must be positive, got {0}")]
    InvalidPointValue(i64),

    /// Point counts cannot be negative.
    #[error("point count must not be negative, got {0}")]
    NegativePoints(i64),

    /// Discount did not fit in minor units.
    #[error("points discount overflowed")]
    Overflow,
}

/// Result of converting requested points into a discount.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointsRedemption {
    /// Points the customer asked to redeem
    pub requested: i64,

    /// Points actually applied after clamping
    pub points_applied: i64,

    /// Discount in minor units
    pub discount: i64,
}

impl PointsRedemption {
    /// Whether fewer points were applied than requested.
    pub fn was_clamped(&self) -> bool {
        self.points_applied < self.requested
    }
}

/// Convert `requested` points into a discount.
///
/// The points applied are the largest count that is no more than the request,
/// no more than the `available` balance, and whose value fits in `remaining`.
/// Exceeding any cap clamps the count rather than rejecting the request.
///
/// # Errors
///
/// Returns a [`LoyaltyError`] for a non-positive point value, negative counts
/// or arithmetic overflow.
pub fn redeem_points(
    requested: i64,
    available: i64,
    point_value: i64,
    remaining: i64,
) -> Result<PointsRedemption, LoyaltyError> {
    if point_value <= 0 {
        return Err(LoyaltyError::InvalidPointValue(point_value));
    }

    if requested < 0 {
        return Err(LoyaltyError::NegativePoints(requested));
    }

    if available < 0 {
        return Err(LoyaltyError::NegativePoints(available));
    }

    let affordable = remaining.max(0) / point_value;
    let points_applied = requested.min(available).min(affordable);

    let discount = points_applied
        .checked_mul(point_value)
        .ok_or(LoyaltyError::Overflow)?;

    Ok(PointsRedemption {
        requested,
        points_applied,
        discount,
    })
}

/// Kind of ledger movement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LedgerEntryKind {
    /// Points spent at checkout
    Redeem,

    /// Points granted
    Earn,
}

impl LedgerEntryKind {
    /// Stable storage name.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Redeem => "redeem",
            Self::Earn => "earn",
        }
    }
}

/// Append-only loyalty ledger entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEntry {
    /// Customer whose balance changed
    pub customer: CustomerId,

    /// Signed change; negative for redemptions
    pub points_change: i64,

    /// Movement kind
    pub kind: LedgerEntryKind,

    /// Human-readable reason
    pub reason: String,

    /// When the movement happened
    pub created_at: Timestamp,
}

impl LedgerEntry {
    /// Debit entry for points redeemed against an order.
    pub fn redemption(
        customer: CustomerId,
        points: i64,
        reason: impl Into<String>,
        created_at: Timestamp,
    ) -> Self {
        Self {
            customer,
            points_change: -points.abs(),
            kind: LedgerEntryKind::Redeem,
            reason: reason.into(),
            created_at,
        }
    }
}
