//! Checkout channels

use std::fmt::{Display, Formatter, Result as FmtResult};

use serde::{Deserialize, Serialize};

/// The flow a checkout attempt comes from.
///
/// Every channel prices through the same engine; they differ only in which
/// cart shapes, outlets and payment methods they accept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckoutChannel {
    /// Customer-facing web checkout.
    Storefront,

    /// Outlet point-of-sale terminal.
    OutletPos,

    /// Order created by a sales representative on behalf of a customer.
    SalesRep,

    /// Order summary widget; prices carts but never commits them.
    Summary,
}

impl CheckoutChannel {
    /// Whether this channel tolerates pre-order and regular lines in one cart.
    #[must_use]
    pub const fn allows_mixed_cart(self) -> bool {
        !matches!(self, Self::OutletPos)
    }

    /// Whether this channel may commit orders.
    #[must_use]
    pub const fn can_commit(self) -> bool {
        !matches!(self, Self::Summary)
    }

    /// Stable wire name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Storefront => "storefront",
            Self::OutletPos => "outlet_pos",
            Self::SalesRep => "sales_rep",
            Self::Summary => "summary",
        }
    }

    /// Parse a wire name.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        [
            Self::Storefront,
            Self::OutletPos,
            Self::SalesRep,
            Self::Summary,
        ]
        .into_iter()
        .find(|channel| channel.as_str() == value)
    }
}

impl Display for CheckoutChannel {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_names_parse_back() {
        for channel in [
            CheckoutChannel::Storefront,
            CheckoutChannel::OutletPos,
            CheckoutChannel::SalesRep,
            CheckoutChannel::Summary,
        ] {
            assert_eq!(CheckoutChannel::parse(channel.as_str()), Some(channel));
        }

        assert_eq!(CheckoutChannel::parse("kiosk"), None);
    }

    #[test]
    fn only_pos_rejects_mixed_carts() {
        assert!(!CheckoutChannel::OutletPos.allows_mixed_cart());
        assert!(CheckoutChannel::SalesRep.allows_mixed_cart());
        assert!(!CheckoutChannel::Summary.can_commit());
    }
}
