//! Order Models

use salvo::oapi::ToSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use storefront_app::domain::orders::records::{OrderItemRecord, OrderRecord};

/// Order line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub(crate) struct OrderItemResponse {
    pub product: Uuid,
    pub sku: String,
    pub name: String,
    pub quantity: u32,
    pub unit_price: i64,
    pub is_pre_order: bool,

    /// Charged with this order; the deposit for pre-order lines
    pub payable_now: i64,
}

impl From<OrderItemRecord> for OrderItemResponse {
    fn from(item: OrderItemRecord) -> Self {
        OrderItemResponse {
            product: item.product_uuid.into_uuid(),
            sku: item.sku,
            name: item.name,
            quantity: item.quantity,
            unit_price: item.unit_price,
            is_pre_order: item.is_pre_order,
            payable_now: item.payable_now,
        }
    }
}

/// Order Response
///
/// Amounts are minor units of `currency`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub(crate) struct OrderResponse {
    pub uuid: Uuid,
    pub customer: Uuid,
    pub channel: String,

    /// `regular` or `pre-order`
    pub order_type: String,

    pub status: String,
    pub payment_status: String,
    pub payment_method: String,
    pub currency: String,
    pub subtotal: i64,
    pub card_promo_discount: i64,
    pub coupon_code: Option<String>,
    pub coupon_discount: i64,
    pub loyalty_points_used: i64,
    pub loyalty_discount: i64,
    pub gift_card_code: Option<String>,
    pub gift_card_discount: i64,
    pub shipping_fee: i64,
    pub total_amount: i64,
    pub full_order_value: i64,

    /// Outlet the stock was taken from
    pub outlet: Option<Uuid>,

    pub items: Vec<OrderItemResponse>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<OrderRecord> for OrderResponse {
    fn from(order: OrderRecord) -> Self {
        OrderResponse {
            uuid: order.uuid.into_uuid(),
            customer: order.customer_uuid.into_uuid(),
            channel: order.channel.as_str().to_string(),
            order_type: order.order_type.to_string(),
            status: order.status.to_string(),
            payment_status: order.payment_status.to_string(),
            payment_method: order.payment_method.to_string(),
            currency: order.currency,
            subtotal: order.subtotal,
            card_promo_discount: order.card_promo_discount_amount,
            coupon_code: order.promo_code,
            coupon_discount: order.discount_amount,
            loyalty_points_used: order.loyalty_points_used,
            loyalty_discount: order.loyalty_discount,
            gift_card_code: order.gift_card_code,
            gift_card_discount: order.gift_card_discount,
            shipping_fee: order.shipping_fee,
            total_amount: order.total_amount,
            full_order_value: order.full_order_value,
            outlet: order.assigned_outlet_uuid.map(|outlet| outlet.into_uuid()),
            items: order.items.into_iter().map(OrderItemResponse::from).collect(),
            created_at: order.created_at.to_string(),
            updated_at: order.updated_at.to_string(),
        }
    }
}
