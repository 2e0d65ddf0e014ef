//! Orders service.

use async_trait::async_trait;
use jiff::Timestamp;
use mockall::automock;
use storefront::{loyalty::LedgerEntry, orders::OrderDraft};
use tracing::{Span, info, warn};

use crate::{
    database::Db,
    domain::{
        catalog::records::ProductUuid,
        orders::{
            errors::OrdersServiceError,
            records::{OrderRecord, OrderUuid},
            repositories::{
                PgLoyaltyRepository, PgOrderItemsRepository, PgOrdersRepository,
                PgRedemptionsRepository, PgStockRepository,
            },
        },
        outlets::records::OutletUuid,
    },
};

#[derive(Debug, Clone)]
pub struct PgOrdersService {
    db: Db,
    orders: PgOrdersRepository,
    items: PgOrderItemsRepository,
    stock: PgStockRepository,
    loyalty: PgLoyaltyRepository,
    redemptions: PgRedemptionsRepository,
}

impl PgOrdersService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            orders: PgOrdersRepository::new(),
            items: PgOrderItemsRepository::new(),
            stock: PgStockRepository::new(),
            loyalty: PgLoyaltyRepository::new(),
            redemptions: PgRedemptionsRepository::new(),
        }
    }
}

#[async_trait]
impl OrdersService for PgOrdersService {
    #[tracing::instrument(
        name = "orders.service.commit_order",
        skip(self, order, draft),
        fields(
            order_uuid = %order,
            customer_uuid = %draft.customer,
            channel = %draft.channel,
            outlet_uuid = tracing::field::Empty,
        ),
        err
    )]
    async fn commit_order(
        &self,
        order: OrderUuid,
        draft: OrderDraft,
    ) -> Result<OrderRecord, OrdersServiceError> {
        let mut tx = self.db.begin().await?;

        let mut regular: Vec<_> = draft.regular_lines().collect();

        if !regular.is_empty() {
            let outlet = OutletUuid::from(draft.outlet.ok_or(OrdersServiceError::OutletRequired)?);

            Span::current().record("outlet_uuid", tracing::field::display(outlet));

            // Lock rows in a fixed order so concurrent commits cannot deadlock.
            regular.sort_by(|a, b| (a.product, &a.sku).cmp(&(b.product, &b.sku)));

            let mut locked = Vec::with_capacity(regular.len());

            for line in &regular {
                let product = ProductUuid::from_uuid(line.product.into_uuid());

                let stock = self
                    .stock
                    .lock_stock(&mut tx, product, line.sku.as_str(), outlet)
                    .await?
                    .ok_or_else(|| OrdersServiceError::VariantNotFound(line.sku.to_string()))?;

                if stock.available() < i64::from(line.quantity) {
                    warn!(
                        sku = %line.sku,
                        requested = line.quantity,
                        available = stock.available(),
                        "rejected order commit: insufficient stock"
                    );

                    return Err(OrdersServiceError::InsufficientStock {
                        sku: line.sku.to_string(),
                        name: line.name.clone(),
                        requested: line.quantity,
                        available: stock.available(),
                    });
                }

                locked.push((stock, line.quantity));
            }

            for (stock, quantity) in locked {
                let decremented = self
                    .stock
                    .decrement(&mut tx, outlet, stock.variant, i64::from(quantity))
                    .await?;

                if !decremented {
                    return Err(OrdersServiceError::InvalidData);
                }
            }
        }

        self.orders.create_order(&mut tx, order, &draft).await?;
        self.items.create_items(&mut tx, order, &draft.lines).await?;

        let breakdown = &draft.breakdown;

        if breakdown.points_applied() > 0 {
            let entry = LedgerEntry::redemption(
                draft.customer,
                breakdown.points_applied(),
                format!("redeemed on order {order}"),
                Timestamp::now(),
            );

            if !self.loyalty.record_redemption(&mut tx, order, &entry).await? {
                warn!(points = breakdown.points_applied(), "rejected order commit: points");

                return Err(OrdersServiceError::InsufficientPoints(
                    breakdown.points_applied(),
                ));
            }
        }

        if let Some(code) = breakdown.coupon_code()
            && !self.redemptions.redeem_coupon(&mut tx, code).await?
        {
            warn!(code, "rejected order commit: coupon exhausted");

            return Err(OrdersServiceError::CouponExhausted(code.to_string()));
        }

        let gift_card_discount = breakdown.gift_card_discount().to_minor_units();

        if let Some(code) = breakdown.gift_card_code()
            && gift_card_discount > 0
            && !self
                .redemptions
                .debit_gift_card(&mut tx, code, gift_card_discount)
                .await?
        {
            warn!(code, "rejected order commit: gift card balance changed");

            return Err(OrdersServiceError::GiftCardBalanceChanged(code.to_string()));
        }

        let mut record = self.orders.get_order(&mut tx, order).await?;
        record.items = self.items.list_items(&mut tx, order).await?;

        tx.commit().await?;

        info!(
            order_uuid = %record.uuid,
            order_type = %record.order_type,
            total_amount = record.total_amount,
            "committed order"
        );

        Ok(record)
    }

    #[tracing::instrument(
        name = "orders.service.get_order",
        skip(self, order),
        fields(order_uuid = %order),
        err
    )]
    async fn get_order(&self, order: OrderUuid) -> Result<OrderRecord, OrdersServiceError> {
        let mut tx = self.db.begin().await?;

        let mut record = self.orders.get_order(&mut tx, order).await?;
        record.items = self.items.list_items(&mut tx, order).await?;

        tx.commit().await?;

        Ok(record)
    }
}

#[automock]
#[async_trait]
pub trait OrdersService: Send + Sync {
    /// Commit a drafted order in a single transaction.
    ///
    /// Live stock of every regular line is locked and checked at the draft's
    /// outlet and then decremented. The order and its items are written,
    /// redeemed points are debited to the ledger, the coupon use is counted
    /// and the gift card is debited. Any failure rolls back every write.
    async fn commit_order(
        &self,
        order: OrderUuid,
        draft: OrderDraft,
    ) -> Result<OrderRecord, OrdersServiceError>;

    /// A committed order with its items.
    async fn get_order(&self, order: OrderUuid) -> Result<OrderRecord, OrdersServiceError>;
}
