//! Gift cards

use jiff::Timestamp;
use rusty_money::{Money, iso::Currency};
use thiserror::Error;

use crate::coupons::normalize_code;

/// Why a gift card cannot be used.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GiftCardError {
    /// No card matches the code.
    #[error("gift card {0} not found")]
    NotFound(String),

    /// The card has expired.
    #[error("gift card {0} has expired")]
    Expired(String),

    /// The card has nothing left on it.
    #[error("gift card {0} has no balance")]
    Empty(String),
}

/// Gift card
#[derive(Debug, Clone)]
pub struct GiftCard<'a> {
    code: String,
    balance: Money<'a, Currency>,
    expires_at: Option<Timestamp>,
}

impl<'a> GiftCard<'a> {
    /// Create a gift card; the code is normalised like coupon codes.
    pub fn new(code: &str, balance: Money<'a, Currency>, expires_at: Option<Timestamp>) -> Self {
        Self {
            code: normalize_code(code),
            balance,
            expires_at,
        }
    }

    /// Uppercased code
    pub fn code(&self) -> &str {
        &self.code
    }

    /// Remaining balance
    pub fn balance(&self) -> &Money<'a, Currency> {
        &self.balance
    }

    /// Check the card can be redeemed at `now`.
    ///
    /// # Errors
    ///
    /// Returns a [`GiftCardError`] if the card has expired or is empty.
    pub fn ensure_usable(&self, now: Timestamp) -> Result<(), GiftCardError> {
        if self.expires_at.is_some_and(|expires_at| expires_at <= now) {
            return Err(GiftCardError::Expired(self.code.clone()));
        }

        if self.balance.to_minor_units() <= 0 {
            return Err(GiftCardError::Empty(self.code.clone()));
        }

        Ok(())
    }

    /// Amount the card covers against `remaining`, in minor units.
    pub fn credit_against(&self, remaining: i64) -> i64 {
        self.balance.to_minor_units().clamp(0, remaining.max(0))
    }
}

#[cfg(test)]
mod tests {
    use jiff::ToSpan;
    use rusty_money::iso::BDT;

    use super::*;

    #[test]
    fn credit_is_capped_by_balance_and_remaining() {
        let card = GiftCard::new("gift-1", Money::from_minor(20_000, BDT), None);

        assert_eq!(card.credit_against(50_000), 20_000);
        assert_eq!(card.credit_against(5_000), 5_000);
        assert_eq!(card.credit_against(-10), 0);
    }

    #[test]
    fn expired_card_is_unusable() {
        let now = Timestamp::now();
        let card = GiftCard::new("gift-1", Money::from_minor(100, BDT), Some(now - 1.hour()));

        assert_eq!(
            card.ensure_usable(now),
            Err(GiftCardError::Expired("GIFT-1".to_string()))
        );
    }

    #[test]
    fn empty_card_is_unusable() {
        let card = GiftCard::new("gift-1", Money::from_minor(0, BDT), None);

        assert_eq!(
            card.ensure_usable(Timestamp::now()),
            Err(GiftCardError::Empty("GIFT-1".to_string()))
        );
    }
}
