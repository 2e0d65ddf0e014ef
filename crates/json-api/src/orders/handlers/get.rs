//! Get Order Handler

use salvo::{
    oapi::extract::PathParam,
    prelude::*,
};
use uuid::Uuid;

use storefront_app::domain::orders::records::OrderUuid;

use crate::{extensions::*, orders::into_status_error, orders::models::OrderResponse};

/// Get Order Handler
///
/// Returns a committed order with its discount breakdown and items.
#[endpoint(
    tags("orders"),
    summary = "Get Order",
    responses(
        (status_code = 200, description = "Order found"),
        (status_code = 404, description = "Order not found"),
        (status_code = 500, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    order: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<OrderResponse>, StatusError> {
    let order = depot
        .app_or_500()?
        .orders
        .get_order(OrderUuid::from_uuid(order.into_inner()))
        .await
        .map_err(into_status_error)?;

    Ok(Json(order.into()))
}
