//! Coupons Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query_as, query_scalar};
use uuid::Uuid;

use crate::{
    database::try_get_count,
    domain::{
        catalog::records::ProductUuid,
        coupons::records::{CouponRecord, CouponUuid, CouponValue},
    },
};

const FIND_COUPON_SQL: &str = include_str!("sql/find_coupon.sql");
const LIST_COUPON_PRODUCTS_SQL: &str = include_str!("sql/list_coupon_products.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgCouponsRepository;

impl PgCouponsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn find_coupon(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        code: &str,
    ) -> Result<Option<CouponRecord>, sqlx::Error> {
        let Some(mut coupon) = query_as::<Postgres, CouponRecord>(FIND_COUPON_SQL)
            .bind(code)
            .fetch_optional(&mut **tx)
            .await?
        else {
            return Ok(None);
        };

        let products: Vec<Uuid> = query_scalar(LIST_COUPON_PRODUCTS_SQL)
            .bind(coupon.uuid.into_uuid())
            .fetch_all(&mut **tx)
            .await?;

        coupon.products = products.into_iter().map(ProductUuid::from_uuid).collect();

        Ok(Some(coupon))
    }
}

impl<'r> FromRow<'r, PgRow> for CouponRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let amount: i64 = row.try_get("value")?;

        let value = match row.try_get::<&str, _>("discount_type")? {
            "fixed" => CouponValue::Fixed { amount },
            "percentage" => CouponValue::Percentage {
                basis_points: u32::try_from(amount).map_err(|e| sqlx::Error::ColumnDecode {
                    index: "value".to_string(),
                    source: Box::new(e),
                })?,
            },
            other => {
                return Err(sqlx::Error::ColumnDecode {
                    index: "discount_type".to_string(),
                    source: format!("unknown discount type {other:?}").into(),
                });
            }
        };

        Ok(Self {
            uuid: CouponUuid::from_uuid(row.try_get("uuid")?),
            code: row.try_get("code")?,
            value,
            minimum_spend: row.try_get("minimum_spend")?,
            expires_at: row.try_get::<SqlxTimestamp, _>("expires_at")?.to_jiff(),
            usage_limit: try_get_count(row, "usage_limit")?,
            used_count: try_get_count(row, "used_count")?,
            products: Vec::new(),
        })
    }
}
