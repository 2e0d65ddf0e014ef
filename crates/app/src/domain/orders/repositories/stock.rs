//! Stock Repository

use sqlx::{Postgres, Transaction, query, query_as, query_scalar};
use uuid::Uuid;

use crate::domain::{
    catalog::records::{ProductUuid, VariantUuid},
    outlets::records::OutletUuid,
};

const LOCK_VARIANT_SQL: &str = include_str!("../sql/lock_variant.sql");
const LOCK_OUTLET_STOCK_SQL: &str = include_str!("../sql/lock_outlet_stock.sql");
const DECREMENT_OUTLET_STOCK_SQL: &str = include_str!("../sql/decrement_outlet_stock.sql");
const DECREMENT_VARIANT_STOCK_SQL: &str = include_str!("../sql/decrement_variant_stock.sql");

/// Live stock of a variant, locked for the rest of the transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct LockedStock {
    pub variant: VariantUuid,
    pub global: i64,
    pub at_outlet: i64,
}

impl LockedStock {
    pub(crate) fn available(&self) -> i64 {
        self.global.min(self.at_outlet)
    }
}

#[derive(Debug, Clone, Default)]
pub(crate) struct PgStockRepository;

impl PgStockRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    /// Lock the variant row, then the outlet's stock row, and read both.
    ///
    /// The outlet read runs after the variant lock is held, so it sees stock
    /// committed by any transaction that held the lock before us.
    pub(crate) async fn lock_stock(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: ProductUuid,
        sku: &str,
        outlet: OutletUuid,
    ) -> Result<Option<LockedStock>, sqlx::Error> {
        let Some((variant, global)): Option<(Uuid, i64)> = query_as(LOCK_VARIANT_SQL)
            .bind(product.into_uuid())
            .bind(sku)
            .fetch_optional(&mut **tx)
            .await?
        else {
            return Ok(None);
        };

        let at_outlet: Option<i64> = query_scalar(LOCK_OUTLET_STOCK_SQL)
            .bind(outlet.into_uuid())
            .bind(variant)
            .fetch_optional(&mut **tx)
            .await?;

        Ok(Some(LockedStock {
            variant: VariantUuid::from_uuid(variant),
            global,
            at_outlet: at_outlet.unwrap_or_default(),
        }))
    }

    /// Take `quantity` units off the outlet and the global counter.
    ///
    /// Returns `false` when either counter would go negative.
    pub(crate) async fn decrement(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        outlet: OutletUuid,
        variant: VariantUuid,
        quantity: i64,
    ) -> Result<bool, sqlx::Error> {
        let outlet_rows = query(DECREMENT_OUTLET_STOCK_SQL)
            .bind(outlet.into_uuid())
            .bind(variant.into_uuid())
            .bind(quantity)
            .execute(&mut **tx)
            .await?
            .rows_affected();

        let variant_rows = query(DECREMENT_VARIANT_STOCK_SQL)
            .bind(variant.into_uuid())
            .bind(quantity)
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(outlet_rows == 1 && variant_rows == 1)
    }
}
