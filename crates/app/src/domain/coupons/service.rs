//! Coupons service.

use async_trait::async_trait;
use mockall::automock;
use storefront::coupons::normalize_code;

use crate::{
    database::Db,
    domain::coupons::{
        errors::CouponsServiceError, records::CouponRecord, repository::PgCouponsRepository,
    },
};

#[derive(Debug, Clone)]
pub struct PgCouponsService {
    db: Db,
    repository: PgCouponsRepository,
}

impl PgCouponsService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgCouponsRepository::new(),
        }
    }
}

#[async_trait]
impl CouponsService for PgCouponsService {
    #[tracing::instrument(
        name = "coupons.service.find_coupon",
        skip(self, code),
        fields(code = tracing::field::Empty),
        err
    )]
    async fn find_coupon(&self, code: String) -> Result<Option<CouponRecord>, CouponsServiceError> {
        let code = normalize_code(&code);

        tracing::Span::current().record("code", tracing::field::display(&code));

        let mut tx = self.db.begin().await?;

        let coupon = self.repository.find_coupon(&mut tx, &code).await?;

        tx.commit().await?;

        Ok(coupon)
    }
}

/// Coupon lookup by code.
#[automock]
#[async_trait]
pub trait CouponsService: Send + Sync {
    /// The coupon with `code`, compared case-insensitively.
    async fn find_coupon(&self, code: String) -> Result<Option<CouponRecord>, CouponsServiceError>;
}
