//! Gift Card Records

use jiff::Timestamp;
use rusty_money::{Money, iso::Currency};
use storefront::gift_cards::GiftCard;

use crate::uuids::TypedUuid;

/// Gift Card UUID
pub type GiftCardUuid = TypedUuid<GiftCardRecord>;

/// Gift Card Record
#[derive(Debug, Clone, PartialEq)]
pub struct GiftCardRecord {
    pub uuid: GiftCardUuid,
    pub code: String,
    pub balance: i64,
    pub expires_at: Option<Timestamp>,
}

impl GiftCardRecord {
    #[must_use]
    pub fn to_gift_card(&self, currency: &'static Currency) -> GiftCard<'static> {
        GiftCard::new(
            &self.code,
            Money::from_minor(self.balance, currency),
            self.expires_at,
        )
    }
}
