//! App Context

use std::sync::Arc;

use thiserror::Error;

use crate::{
    database::{self, Db},
    domain::{
        catalog::PgCatalogService,
        checkout::{
            CheckoutCollaborators, CheckoutService, StorefrontCheckoutService,
            data::CheckoutSettings,
        },
        coupons::PgCouponsService,
        customers::PgCustomersService,
        gift_cards::PgGiftCardsService,
        orders::{OrdersService, PgOrdersService},
        outlets::PgOutletsService,
    },
    payments::{HttpPaymentGateway, PaymentGatewayConfig},
};

#[derive(Debug, Error)]
pub enum AppInitError {
    #[error("failed to connect to database")]
    Database(#[source] sqlx::Error),
}

#[derive(Clone)]
pub struct AppContext {
    pub checkout: Arc<dyn CheckoutService>,
    pub orders: Arc<dyn OrdersService>,
}

impl AppContext {
    /// Build application context from a database URL.
    ///
    /// # Errors
    ///
    /// Returns an error when establishing a database connection fails.
    pub async fn from_database_url(
        url: &str,
        payments: PaymentGatewayConfig,
        settings: CheckoutSettings,
    ) -> Result<Self, AppInitError> {
        let pool = database::connect(url)
            .await
            .map_err(AppInitError::Database)?;

        let db = Db::new(pool);
        let orders = Arc::new(PgOrdersService::new(db.clone()));

        let checkout = StorefrontCheckoutService::new(
            CheckoutCollaborators {
                catalog: Arc::new(PgCatalogService::new(db.clone())),
                outlets: Arc::new(PgOutletsService::new(db.clone())),
                customers: Arc::new(PgCustomersService::new(db.clone())),
                coupons: Arc::new(PgCouponsService::new(db.clone())),
                gift_cards: Arc::new(PgGiftCardsService::new(db)),
                orders: orders.clone(),
                payments: Arc::new(HttpPaymentGateway::new(payments)),
            },
            settings,
        );

        Ok(Self {
            checkout: Arc::new(checkout),
            orders,
        })
    }
}
