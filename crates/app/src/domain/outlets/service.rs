//! Outlets service.

use async_trait::async_trait;
use mockall::automock;

use crate::{
    database::Db,
    domain::outlets::{
        errors::OutletsServiceError,
        records::{OutletRecord, OutletUuid},
        repository::PgOutletsRepository,
    },
};

#[derive(Debug, Clone)]
pub struct PgOutletsService {
    db: Db,
    repository: PgOutletsRepository,
}

impl PgOutletsService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgOutletsRepository::new(),
        }
    }
}

#[async_trait]
impl OutletsService for PgOutletsService {
    #[tracing::instrument(name = "outlets.service.list_active_outlets", skip(self), err)]
    async fn list_active_outlets(&self) -> Result<Vec<OutletRecord>, OutletsServiceError> {
        let mut tx = self.db.begin().await?;

        let outlets = self.repository.list_active_outlets(&mut tx).await?;

        tx.commit().await?;

        Ok(outlets)
    }

    #[tracing::instrument(
        name = "outlets.service.get_outlet",
        skip(self, outlet),
        fields(outlet_uuid = %outlet),
        err
    )]
    async fn get_outlet(&self, outlet: OutletUuid) -> Result<OutletRecord, OutletsServiceError> {
        let mut tx = self.db.begin().await?;

        let outlet = self.repository.get_outlet(&mut tx, outlet).await?;

        tx.commit().await?;

        Ok(outlet)
    }
}

/// Directory of the outlets that fulfill orders.
#[automock]
#[async_trait]
pub trait OutletsService: Send + Sync {
    /// Active outlets, in directory order.
    async fn list_active_outlets(&self) -> Result<Vec<OutletRecord>, OutletsServiceError>;

    /// A single outlet, whatever its status.
    async fn get_outlet(&self, outlet: OutletUuid) -> Result<OutletRecord, OutletsServiceError>;
}

#[cfg(test)]
mod tests {
    use storefront::outlets::OutletStatus;
    use testresult::TestResult;

    use super::*;
    use crate::test::{TestContext, helpers::create_outlet};

    #[tokio::test]
    async fn list_active_outlets_skips_inactive_and_keeps_directory_order() -> TestResult {
        let ctx = TestContext::new().await;

        let uttara = create_outlet(&ctx, "Uttara", (23.8759, 90.3795), "Dhaka", false, 0).await?;
        let gulshan = create_outlet(&ctx, "Gulshan", (23.7925, 90.4078), "Dhaka", true, 2).await?;
        let banani = create_outlet(&ctx, "Banani", (23.7940, 90.4043), "Dhaka", true, 1).await?;

        let outlets = ctx.outlets.list_active_outlets().await?;
        let uuids: Vec<OutletUuid> = outlets.iter().map(|outlet| outlet.uuid).collect();

        assert_eq!(uuids, vec![banani, gulshan]);
        assert!(!uuids.contains(&uttara));

        Ok(())
    }

    #[tokio::test]
    async fn get_outlet_returns_inactive_outlets_too() -> TestResult {
        let ctx = TestContext::new().await;

        let uttara = create_outlet(&ctx, "Uttara", (23.8759, 90.3795), "Dhaka", false, 0).await?;

        let outlet = ctx.outlets.get_outlet(uttara).await?;

        assert_eq!(outlet.status, OutletStatus::Inactive);
        assert_eq!(outlet.to_outlet().district, "Dhaka");

        Ok(())
    }

    #[tokio::test]
    async fn get_outlet_unknown_uuid_returns_not_found() {
        let ctx = TestContext::new().await;

        let result = ctx.outlets.get_outlet(OutletUuid::new()).await;

        assert!(
            matches!(result, Err(OutletsServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );
    }
}
