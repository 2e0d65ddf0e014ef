//! Checkout Errors

use std::fmt::Debug;

use salvo::http::StatusError;
use tracing::error;

use storefront::{
    fulfillment::FulfillmentError, gift_cards::GiftCardError, orders::CheckoutError,
    pricing::PricingError,
};
use storefront_app::domain::{checkout::CheckoutServiceError, customers::CustomersServiceError};

use crate::orders;

pub(crate) fn into_status_error(error: CheckoutServiceError) -> StatusError {
    match error {
        CheckoutServiceError::UnknownVariant(sku) => {
            StatusError::not_found().brief(format!("Unknown product variant {sku}"))
        }
        CheckoutServiceError::Cart(error) => unprocessable(&error),
        CheckoutServiceError::Pricing(PricingError::InvalidCardPromo) => {
            error!("customer card promotion is out of range");

            StatusError::internal_server_error()
        }
        CheckoutServiceError::Pricing(error) => unprocessable(&error),
        CheckoutServiceError::Coupon(rejection) => unprocessable(&rejection),
        CheckoutServiceError::GiftCard(error @ GiftCardError::NotFound(_)) => {
            StatusError::not_found().brief(error.to_string())
        }
        CheckoutServiceError::GiftCard(error) => unprocessable(&error),
        CheckoutServiceError::Fulfillment(error) => fulfillment_error(&error),
        CheckoutServiceError::Checkout(CheckoutError::Cart(error)) => unprocessable(&error),
        CheckoutServiceError::Checkout(error) => StatusError::bad_request().brief(error.to_string()),
        CheckoutServiceError::Customers(CustomersServiceError::NotFound) => {
            StatusError::not_found().brief("Customer not found")
        }
        CheckoutServiceError::Customers(error) => storage_error("customers", &error),
        CheckoutServiceError::Catalog(error) => storage_error("catalog", &error),
        CheckoutServiceError::Outlets(error) => storage_error("outlets", &error),
        CheckoutServiceError::Coupons(error) => storage_error("coupons", &error),
        CheckoutServiceError::GiftCards(error) => storage_error("gift cards", &error),
        CheckoutServiceError::Orders(error) => orders::into_status_error(error),
        CheckoutServiceError::Payment { order, source } => {
            error!(%order, "failed to open payment session: {source}");

            StatusError::bad_gateway().brief(format!(
                "Order {order} was placed but the payment gateway is unavailable"
            ))
        }
    }
}

fn fulfillment_error(error: &FulfillmentError) -> StatusError {
    match error {
        FulfillmentError::NoFulfillingOutlet | FulfillmentError::InsufficientStock { .. } => {
            StatusError::conflict().brief(error.to_string())
        }
        FulfillmentError::OutletNotFound(_) => StatusError::not_found().brief(error.to_string()),
        FulfillmentError::OutletInactive(_) => unprocessable(error),
    }
}

fn unprocessable(error: &impl ToString) -> StatusError {
    StatusError::unprocessable_entity().brief(error.to_string())
}

fn storage_error(collaborator: &str, error: &impl Debug) -> StatusError {
    error!("{collaborator} lookup failed: {error:?}");

    StatusError::internal_server_error()
}
