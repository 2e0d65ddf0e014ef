//! Checkout Service Errors

use storefront::{
    cart::CartError,
    coupons::{CouponError, CouponRejection},
    fulfillment::FulfillmentError,
    gift_cards::GiftCardError,
    orders::CheckoutError,
    pricing::PricingError,
};
use thiserror::Error;

use crate::{
    domain::{
        catalog::CatalogServiceError, coupons::CouponsServiceError,
        customers::CustomersServiceError, gift_cards::GiftCardsServiceError,
        orders::{OrdersServiceError, records::OrderUuid},
        outlets::OutletsServiceError,
    },
    payments::PaymentGatewayError,
};

#[derive(Debug, Error)]
pub enum CheckoutServiceError {
    #[error("variant {0} not found")]
    UnknownVariant(String),

    #[error(transparent)]
    Cart(#[from] CartError),

    #[error(transparent)]
    Pricing(#[from] PricingError),

    #[error(transparent)]
    Coupon(#[from] CouponRejection),

    #[error(transparent)]
    GiftCard(#[from] GiftCardError),

    #[error(transparent)]
    Fulfillment(#[from] FulfillmentError),

    #[error(transparent)]
    Checkout(#[from] CheckoutError),

    #[error(transparent)]
    Catalog(#[from] CatalogServiceError),

    #[error(transparent)]
    Outlets(#[from] OutletsServiceError),

    #[error(transparent)]
    Customers(#[from] CustomersServiceError),

    #[error(transparent)]
    Coupons(#[from] CouponsServiceError),

    #[error(transparent)]
    GiftCards(#[from] GiftCardsServiceError),

    #[error(transparent)]
    Orders(#[from] OrdersServiceError),

    /// The order is committed; only the payment session is missing.
    #[error("order {order} was placed but no payment session could be created")]
    Payment {
        order: OrderUuid,
        #[source]
        source: PaymentGatewayError,
    },
}

impl From<CouponError> for CheckoutServiceError {
    fn from(error: CouponError) -> Self {
        match error {
            CouponError::Rejected(rejection) => Self::Coupon(rejection),
            CouponError::Cart(error) => Self::Cart(error),
            CouponError::Discount(error) => Self::Pricing(PricingError::Discount(error)),
        }
    }
}
