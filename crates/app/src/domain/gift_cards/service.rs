//! Gift cards service.

use async_trait::async_trait;
use mockall::automock;
use storefront::coupons::normalize_code;

use crate::{
    database::Db,
    domain::gift_cards::{
        errors::GiftCardsServiceError, records::GiftCardRecord,
        repository::PgGiftCardsRepository,
    },
};

#[derive(Debug, Clone)]
pub struct PgGiftCardsService {
    db: Db,
    repository: PgGiftCardsRepository,
}

impl PgGiftCardsService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgGiftCardsRepository::new(),
        }
    }
}

#[async_trait]
impl GiftCardsService for PgGiftCardsService {
    #[tracing::instrument(name = "gift_cards.service.find_gift_card", skip(self, code), err)]
    async fn find_gift_card(
        &self,
        code: String,
    ) -> Result<Option<GiftCardRecord>, GiftCardsServiceError> {
        let mut tx = self.db.begin().await?;

        let card = self
            .repository
            .find_gift_card(&mut tx, &normalize_code(&code))
            .await?;

        tx.commit().await?;

        Ok(card)
    }
}

/// Gift card lookup by code.
#[automock]
#[async_trait]
pub trait GiftCardsService: Send + Sync {
    /// The gift card with `code`, compared case-insensitively.
    async fn find_gift_card(
        &self,
        code: String,
    ) -> Result<Option<GiftCardRecord>, GiftCardsServiceError>;
}
