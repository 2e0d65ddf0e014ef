//! Catalog service.

use async_trait::async_trait;
use mockall::automock;

use crate::{
    database::Db,
    domain::catalog::{
        data::VariantKey, errors::CatalogServiceError, records::VariantRecord,
        repository::PgCatalogRepository,
    },
};

#[derive(Debug, Clone)]
pub struct PgCatalogService {
    db: Db,
    repository: PgCatalogRepository,
}

impl PgCatalogService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgCatalogRepository::new(),
        }
    }
}

#[async_trait]
impl CatalogService for PgCatalogService {
    #[tracing::instrument(
        name = "catalog.service.get_variants",
        skip(self, keys),
        fields(requested = keys.len()),
        err
    )]
    async fn get_variants(
        &self,
        keys: Vec<VariantKey>,
    ) -> Result<Vec<VariantRecord>, CatalogServiceError> {
        let mut tx = self.db.begin().await?;

        let variants = self.repository.get_variants(&mut tx, &keys).await?;

        tx.commit().await?;

        Ok(variants)
    }
}

/// Read access to sellable variants.
#[automock]
#[async_trait]
pub trait CatalogService: Send + Sync {
    /// Variants matching `keys`, with their stock at every outlet.
    ///
    /// Unknown keys are left out of the result.
    async fn get_variants(
        &self,
        keys: Vec<VariantKey>,
    ) -> Result<Vec<VariantRecord>, CatalogServiceError>;
}
