//! Customers

use std::fmt::{Display, Formatter, Result as FmtResult};

use decimal_percentage::Percentage;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::outlets::GeoPoint;

/// Customer identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CustomerId(Uuid);

impl CustomerId {
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

impl Display for CustomerId {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        Display::fmt(&self.0, f)
    }
}

/// Delivery address on file for a customer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Address {
    /// Street address
    pub line: String,

    /// District, compared against the outlet district for shipping.
    pub district: String,

    /// Coordinates, when the address has been geocoded.
    pub location: Option<GeoPoint>,
}

/// The parts of a customer profile checkout reads.
#[derive(Debug, Clone)]
pub struct CustomerProfile {
    /// Identifier
    pub id: CustomerId,

    /// Current loyalty balance
    pub loyalty_points: i64,

    /// Card-tier promotion granted by the membership tier
    pub card_promo: Percentage,

    /// Membership tier name, if any
    pub membership_tier: Option<String>,

    /// Saved addresses
    pub addresses: Vec<Address>,
}
