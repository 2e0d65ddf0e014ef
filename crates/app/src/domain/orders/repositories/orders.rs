//! Orders Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use rusty_money::iso::Currency;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as};
use storefront::{
    channels::CheckoutChannel,
    orders::{OrderDraft, OrderStatus, OrderType, PaymentMethod, PaymentStatus},
};
use uuid::Uuid;

use crate::domain::{
    customers::records::CustomerUuid,
    orders::records::{OrderRecord, OrderUuid},
    outlets::records::OutletUuid,
};

const CREATE_ORDER_SQL: &str = include_str!("../sql/create_order.sql");
const GET_ORDER_SQL: &str = include_str!("../sql/get_order.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgOrdersRepository;

impl PgOrdersRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn create_order(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
        draft: &OrderDraft,
    ) -> Result<(), sqlx::Error> {
        let breakdown = &draft.breakdown;
        let currency: &Currency = breakdown.currency();

        query(CREATE_ORDER_SQL)
            .bind(order.into_uuid())
            .bind(draft.customer.into_uuid())
            .bind(draft.channel.as_str())
            .bind(draft.order_type.as_str())
            .bind(draft.status.as_str())
            .bind(draft.payment_status.as_str())
            .bind(draft.payment_method.as_str())
            .bind(currency.iso_alpha_code)
            .bind(breakdown.subtotal().to_minor_units())
            .bind(breakdown.card_discount().to_minor_units())
            .bind(breakdown.coupon_discount().to_minor_units())
            .bind(breakdown.coupon_code())
            .bind(breakdown.points_applied())
            .bind(breakdown.points_discount().to_minor_units())
            .bind(breakdown.gift_card_code())
            .bind(breakdown.gift_card_discount().to_minor_units())
            .bind(breakdown.shipping_fee().to_minor_units())
            .bind(breakdown.total_amount().to_minor_units())
            .bind(breakdown.full_order_value().to_minor_units())
            .bind(draft.outlet.map(|outlet| outlet.into_uuid()))
            .execute(&mut **tx)
            .await?;

        Ok(())
    }

    pub(crate) async fn get_order(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
    ) -> Result<OrderRecord, sqlx::Error> {
        query_as::<Postgres, OrderRecord>(GET_ORDER_SQL)
            .bind(order.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }
}

fn decode<T>(column: &str, value: &str, parse: impl Fn(&str) -> Option<T>) -> sqlx::Result<T> {
    parse(value).ok_or_else(|| sqlx::Error::ColumnDecode {
        index: column.to_string(),
        source: format!("unknown {column} {value:?}").into(),
    })
}

impl<'r> FromRow<'r, PgRow> for OrderRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: OrderUuid::from_uuid(row.try_get("uuid")?),
            customer_uuid: CustomerUuid::from_uuid(row.try_get("customer_uuid")?),
            channel: decode("channel", row.try_get("channel")?, CheckoutChannel::parse)?,
            order_type: decode("order_type", row.try_get("order_type")?, OrderType::parse)?,
            status: decode("status", row.try_get("status")?, OrderStatus::parse)?,
            payment_status: decode(
                "payment_status",
                row.try_get("payment_status")?,
                PaymentStatus::parse,
            )?,
            payment_method: decode(
                "payment_method",
                row.try_get("payment_method")?,
                PaymentMethod::parse,
            )?,
            currency: row.try_get("currency")?,
            subtotal: row.try_get("subtotal")?,
            card_promo_discount_amount: row.try_get("card_promo_discount_amount")?,
            discount_amount: row.try_get("discount_amount")?,
            promo_code: row.try_get("promo_code")?,
            loyalty_points_used: row.try_get("loyalty_points_used")?,
            loyalty_discount: row.try_get("loyalty_discount")?,
            gift_card_code: row.try_get("gift_card_code")?,
            gift_card_discount: row.try_get("gift_card_discount")?,
            shipping_fee: row.try_get("shipping_fee")?,
            total_amount: row.try_get("total_amount")?,
            full_order_value: row.try_get("full_order_value")?,
            assigned_outlet_uuid: row
                .try_get::<Option<Uuid>, _>("assigned_outlet_uuid")?
                .map(OutletUuid::from_uuid),
            items: Vec::new(),
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}
