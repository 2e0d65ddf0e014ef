//! Loyalty Ledger Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{Postgres, Transaction, query};
use storefront::loyalty::LedgerEntry;

use crate::domain::orders::records::{LedgerEntryUuid, OrderUuid};

const DEBIT_POINTS_SQL: &str = include_str!("../sql/debit_points.sql");
const CREATE_LEDGER_ENTRY_SQL: &str = include_str!("../sql/create_ledger_entry.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgLoyaltyRepository;

impl PgLoyaltyRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    /// Debit a redemption from the customer's balance and append it to the ledger.
    ///
    /// Returns `false`, writing nothing, when the balance cannot cover it.
    pub(crate) async fn record_redemption(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
        entry: &LedgerEntry,
    ) -> Result<bool, sqlx::Error> {
        let rows_affected = query(DEBIT_POINTS_SQL)
            .bind(entry.customer.into_uuid())
            .bind(-entry.points_change)
            .execute(&mut **tx)
            .await?
            .rows_affected();

        if rows_affected == 0 {
            return Ok(false);
        }

        query(CREATE_LEDGER_ENTRY_SQL)
            .bind(LedgerEntryUuid::new().into_uuid())
            .bind(entry.customer.into_uuid())
            .bind(order.into_uuid())
            .bind(entry.points_change)
            .bind(entry.kind.as_str())
            .bind(&entry.reason)
            .bind(SqlxTimestamp::from(entry.created_at))
            .execute(&mut **tx)
            .await?;

        Ok(true)
    }
}
