//! Outlets Repository

use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query_as};
use storefront::outlets::OutletStatus;

use crate::domain::outlets::records::{OutletRecord, OutletUuid};

const LIST_ACTIVE_OUTLETS_SQL: &str = include_str!("sql/list_active_outlets.sql");
const GET_OUTLET_SQL: &str = include_str!("sql/get_outlet.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgOutletsRepository;

impl PgOutletsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn list_active_outlets(
        &self,
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<Vec<OutletRecord>, sqlx::Error> {
        query_as::<Postgres, OutletRecord>(LIST_ACTIVE_OUTLETS_SQL)
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn get_outlet(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        outlet: OutletUuid,
    ) -> Result<OutletRecord, sqlx::Error> {
        query_as::<Postgres, OutletRecord>(GET_OUTLET_SQL)
            .bind(outlet.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }
}

impl<'r> FromRow<'r, PgRow> for OutletRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let status = match row.try_get::<&str, _>("status")? {
            "active" => OutletStatus::Active,
            "inactive" => OutletStatus::Inactive,
            other => {
                return Err(sqlx::Error::ColumnDecode {
                    index: "status".to_string(),
                    source: format!("unknown outlet status {other:?}").into(),
                });
            }
        };

        Ok(Self {
            uuid: OutletUuid::from_uuid(row.try_get("uuid")?),
            name: row.try_get("name")?,
            status,
            latitude: row.try_get("latitude")?,
            longitude: row.try_get("longitude")?,
            address: row.try_get("address")?,
            district: row.try_get("district")?,
        })
    }
}
