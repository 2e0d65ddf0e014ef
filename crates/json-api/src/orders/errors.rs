//! Order Errors

use salvo::http::StatusError;
use tracing::error;

use storefront_app::domain::orders::OrdersServiceError;

pub(crate) fn into_status_error(error: OrdersServiceError) -> StatusError {
    match error {
        OrdersServiceError::NotFound => StatusError::not_found().brief("Order not found"),
        OrdersServiceError::InsufficientStock { .. }
        | OrdersServiceError::CouponExhausted(_)
        | OrdersServiceError::InsufficientPoints(_)
        | OrdersServiceError::GiftCardBalanceChanged(_)
        | OrdersServiceError::VariantNotFound(_)
        | OrdersServiceError::AlreadyExists => StatusError::conflict().brief(error.to_string()),
        OrdersServiceError::OutletRequired => StatusError::bad_request().brief(error.to_string()),
        OrdersServiceError::InvalidReference
        | OrdersServiceError::MissingRequiredData
        | OrdersServiceError::InvalidData => {
            StatusError::bad_request().brief("Invalid order payload")
        }
        OrdersServiceError::Sql(source) => {
            error!("order storage failed: {source}");

            StatusError::internal_server_error()
        }
    }
}
