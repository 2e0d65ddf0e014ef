//! Catalog Repository

use rustc_hash::FxHashMap;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query_as};
use tracing::debug;
use uuid::Uuid;

use crate::domain::{
    catalog::{
        data::VariantKey,
        records::{DepositRecord, ProductUuid, VariantRecord, VariantUuid},
    },
    outlets::records::OutletUuid,
};

const GET_VARIANTS_SQL: &str = include_str!("sql/get_variants.sql");
const LIST_OUTLET_STOCKS_SQL: &str = include_str!("sql/list_outlet_stocks.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgCatalogRepository;

impl PgCatalogRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn get_variants(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        keys: &[VariantKey],
    ) -> Result<Vec<VariantRecord>, sqlx::Error> {
        let products: Vec<Uuid> = keys.iter().map(|key| key.product.into_uuid()).collect();
        let skus: Vec<String> = keys.iter().map(|key| key.sku.clone()).collect();

        let mut variants = query_as::<Postgres, VariantRecord>(GET_VARIANTS_SQL)
            .bind(products)
            .bind(skus)
            .fetch_all(&mut **tx)
            .await?;

        let uuids: Vec<Uuid> = variants.iter().map(|variant| variant.uuid.into_uuid()).collect();

        let stocks: Vec<(Uuid, Uuid, i64)> = query_as(LIST_OUTLET_STOCKS_SQL)
            .bind(uuids)
            .fetch_all(&mut **tx)
            .await?;

        debug!(
            variants = variants.len(),
            outlet_stocks = stocks.len(),
            "loaded catalog variants"
        );

        let mut by_variant: FxHashMap<Uuid, FxHashMap<OutletUuid, i64>> = FxHashMap::default();

        for (variant, outlet, quantity) in stocks {
            by_variant
                .entry(variant)
                .or_default()
                .insert(OutletUuid::from_uuid(outlet), quantity);
        }

        for variant in &mut variants {
            if let Some(outlet_stocks) = by_variant.remove(&variant.uuid.into_uuid()) {
                variant.outlet_stocks = outlet_stocks;
            }
        }

        Ok(variants)
    }
}

impl<'r> FromRow<'r, PgRow> for VariantRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let deposit_type: Option<&str> = row.try_get("deposit_type")?;
        let deposit_amount: Option<i64> = row.try_get("deposit_amount")?;

        let deposit = match (deposit_type, deposit_amount) {
            (None, _) | (_, None) => None,
            (Some("per_unit"), Some(amount)) => Some(DepositRecord::PerUnit { amount }),
            (Some("percentage"), Some(amount)) => {
                let basis_points =
                    u32::try_from(amount).map_err(|e| sqlx::Error::ColumnDecode {
                        index: "deposit_amount".to_string(),
                        source: Box::new(e),
                    })?;

                Some(DepositRecord::Percentage { basis_points })
            }
            (Some(other), Some(_)) => {
                return Err(sqlx::Error::ColumnDecode {
                    index: "deposit_type".to_string(),
                    source: format!("unknown deposit type {other:?}").into(),
                });
            }
        };

        Ok(Self {
            uuid: VariantUuid::from_uuid(row.try_get("uuid")?),
            product_uuid: ProductUuid::from_uuid(row.try_get("product_uuid")?),
            sku: row.try_get("sku")?,
            name: row.try_get("name")?,
            price: row.try_get("price")?,
            stock: row.try_get("stock")?,
            is_pre_order: row.try_get("is_pre_order")?,
            deposit,
            outlet_stocks: FxHashMap::default(),
        })
    }
}
