//! Gift Cards Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query_as};

use crate::domain::gift_cards::records::{GiftCardRecord, GiftCardUuid};

const FIND_GIFT_CARD_SQL: &str = include_str!("sql/find_gift_card.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgGiftCardsRepository;

impl PgGiftCardsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn find_gift_card(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        code: &str,
    ) -> Result<Option<GiftCardRecord>, sqlx::Error> {
        query_as::<Postgres, GiftCardRecord>(FIND_GIFT_CARD_SQL)
            .bind(code)
            .fetch_optional(&mut **tx)
            .await
    }
}

impl<'r> FromRow<'r, PgRow> for GiftCardRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: GiftCardUuid::from_uuid(row.try_get("uuid")?),
            code: row.try_get("code")?,
            balance: row.try_get("balance")?,
            expires_at: row
                .try_get::<Option<SqlxTimestamp>, _>("expires_at")?
                .map(SqlxTimestamp::to_jiff),
        })
    }
}
