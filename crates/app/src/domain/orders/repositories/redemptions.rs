//! Coupon and Gift Card Redemptions Repository

use sqlx::{Postgres, Transaction, query};

const REDEEM_COUPON_SQL: &str = include_str!("../sql/redeem_coupon.sql");
const DEBIT_GIFT_CARD_SQL: &str = include_str!("../sql/debit_gift_card.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgRedemptionsRepository;

impl PgRedemptionsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    /// Count one use of the coupon; `false` once the limit is reached.
    pub(crate) async fn redeem_coupon(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        code: &str,
    ) -> Result<bool, sqlx::Error> {
        let rows_affected = query(REDEEM_COUPON_SQL)
            .bind(code)
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected == 1)
    }

    /// Debit `amount` from the gift card; `false` when the balance is short.
    pub(crate) async fn debit_gift_card(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        code: &str,
        amount: i64,
    ) -> Result<bool, sqlx::Error> {
        let rows_affected = query(DEBIT_GIFT_CARD_SQL)
            .bind(code)
            .bind(amount)
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected == 1)
    }
}
