//! Place Order Handler

use salvo::{
    http::header::LOCATION,
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use storefront::orders::PaymentMethod;
use storefront_app::domain::{
    checkout::{CheckoutServiceError, data::PlacedOrder},
    orders::OrdersServiceError,
};

use crate::{checkout, checkout::models::CheckoutPayload, extensions::*, observability};

/// Place Order Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct PlaceOrderRequest {
    #[serde(flatten)]
    pub checkout: CheckoutPayload,

    /// `cod`, `online` or `cash`
    pub payment_method: String,
}

/// Place Order Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct OrderPlacedResponse {
    /// Committed order UUID
    pub uuid: Uuid,

    pub status: String,
    pub payment_status: String,

    /// Payable now, including shipping
    pub total_amount: i64,

    /// Hosted payment page for online payments
    pub redirect_url: Option<String>,
}

impl From<PlacedOrder> for OrderPlacedResponse {
    fn from(placed: PlacedOrder) -> Self {
        OrderPlacedResponse {
            uuid: placed.uuid().into_uuid(),
            status: placed.order.status.to_string(),
            payment_status: placed.order.payment_status.to_string(),
            total_amount: placed.order.total_amount,
            redirect_url: placed.payment.map(|session| session.redirect_url),
        }
    }
}

/// Place Order Handler
///
/// Prices the cart again, commits the order with its stock, points, coupon and
/// gift card debits in one transaction and, for online payments, opens a
/// payment session.
#[endpoint(
    tags("orders"),
    summary = "Place Order",
    responses(
        (status_code = 201, description = "Order placed"),
        (status_code = 400, description = "Bad Request"),
        (status_code = 404, description = "Unknown customer, variant, outlet or gift card"),
        (status_code = 409, description = "Stock, coupon, points or gift card changed"),
        (status_code = 422, description = "Cart cannot be checked out"),
        (status_code = 502, description = "Order placed but the payment gateway failed"),
        (status_code = 500, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<PlaceOrderRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<OrderPlacedResponse>, StatusError> {
    let body = json.into_inner();

    let payment_method = PaymentMethod::parse(&body.payment_method).ok_or_else(|| {
        StatusError::bad_request().brief(format!(
            "Unknown payment method {:?}",
            body.payment_method
        ))
    })?;

    let request = body.checkout.into_request()?;
    let channel = request.channel.as_str();

    let result = depot
        .app_or_500()?
        .checkout
        .place_order(request, payment_method)
        .await;

    let outcome = commit_outcome(&result);

    observability::observe_order_commit(channel, outcome);

    let placed = match result {
        Ok(placed) => placed,
        Err(error) => {
            warn!(channel, outcome, "order placement rejected: {error}");

            return Err(checkout::into_status_error(error));
        }
    };

    let uuid = placed.uuid();

    info!(%uuid, channel, %payment_method, "order placed");

    res.add_header(LOCATION, format!("/orders/{uuid}"), true)
        .or_500("failed to set location header")?
        .status_code(StatusCode::CREATED);

    Ok(Json(placed.into()))
}

fn commit_outcome(result: &Result<PlacedOrder, CheckoutServiceError>) -> &'static str {
    match result {
        Ok(_) => "committed",
        Err(CheckoutServiceError::Payment { .. }) => "committed_without_payment",
        Err(CheckoutServiceError::Orders(error)) => match error {
            OrdersServiceError::InsufficientStock { .. } => "insufficient_stock",
            OrdersServiceError::CouponExhausted(_) => "coupon_exhausted",
            OrdersServiceError::InsufficientPoints(_) => "insufficient_points",
            OrdersServiceError::GiftCardBalanceChanged(_) => "gift_card_balance_changed",
            _ => "storage_error",
        },
        Err(CheckoutServiceError::Fulfillment(_)) => "unfulfillable",
        Err(_) => "rejected",
    }
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::json;
    use storefront::{channels::CheckoutChannel, coupons::CouponRejection, orders::OrderStatus};
    use storefront_app::{
        domain::{checkout::MockCheckoutService, orders::records::OrderUuid},
        payments::{PaymentGatewayError, PaymentSession},
    };
    use testresult::TestResult;

    use crate::test_helpers::{checkout_service, make_order};

    use super::*;

    fn make_service(checkout: MockCheckoutService) -> Service {
        checkout_service(checkout, Router::with_path("orders").post(handler))
    }

    fn body(payment_method: &str) -> serde_json::Value {
        json!({
            "channel": "storefront",
            "customer": Uuid::nil(),
            "lines": [{ "product": Uuid::nil(), "sku": "TEE-M", "quantity": 2 }],
            "points": 100,
            "payment_method": payment_method
        })
    }

    #[tokio::test]
    async fn test_online_order_returns_201_with_redirect() -> TestResult {
        let mut checkout = MockCheckoutService::new();
        let uuid = OrderUuid::new();

        let mut order = make_order(uuid);
        order.status = OrderStatus::PendingPayment;

        checkout
            .expect_place_order()
            .once()
            .withf(|request, method| {
                request.channel == CheckoutChannel::Storefront
                    && request.points == 100
                    && *method == PaymentMethod::Online
            })
            .return_once(move |_, _| {
                Ok(PlacedOrder {
                    order,
                    payment: Some(PaymentSession {
                        redirect_url: "https://pay.example.com/s/1".to_string(),
                    }),
                })
            });

        let mut res = TestClient::post("http://example.com/orders")
            .json(&body("online"))
            .send(&make_service(checkout))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::CREATED));

        let location = res
            .headers()
            .get(LOCATION)
            .ok_or("missing location header")?
            .to_str()?
            .to_string();

        assert_eq!(location, format!("/orders/{uuid}"));

        let response: OrderPlacedResponse = res.take_json().await?;

        assert_eq!(response.uuid, uuid.into_uuid());
        assert_eq!(response.status, "pending_payment");
        assert_eq!(
            response.redirect_url.as_deref(),
            Some("https://pay.example.com/s/1")
        );

        Ok(())
    }

    #[tokio::test]
    async fn test_unknown_payment_method_returns_400() -> TestResult {
        let mut checkout = MockCheckoutService::new();

        checkout.expect_place_order().never();

        let res = TestClient::post("http://example.com/orders")
            .json(&body("cheque"))
            .send(&make_service(checkout))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }

    #[tokio::test]
    async fn test_oversold_stock_returns_409() -> TestResult {
        let mut checkout = MockCheckoutService::new();

        checkout.expect_place_order().once().return_once(|_, _| {
            Err(CheckoutServiceError::Orders(
                OrdersServiceError::InsufficientStock {
                    sku: "TEE-M".to_string(),
                    name: "Tee".to_string(),
                    requested: 2,
                    available: 1,
                },
            ))
        });

        let res = TestClient::post("http://example.com/orders")
            .json(&body("cod"))
            .send(&make_service(checkout))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::CONFLICT));

        Ok(())
    }

    #[tokio::test]
    async fn test_rejected_coupon_returns_422() -> TestResult {
        let mut checkout = MockCheckoutService::new();

        checkout
            .expect_place_order()
            .once()
            .return_once(|_, _| Err(CheckoutServiceError::Coupon(CouponRejection::Expired)));

        let res = TestClient::post("http://example.com/orders")
            .json(&body("cod"))
            .send(&make_service(checkout))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::UNPROCESSABLE_ENTITY));

        Ok(())
    }

    #[tokio::test]
    async fn test_gateway_failure_returns_502() -> TestResult {
        let mut checkout = MockCheckoutService::new();

        checkout.expect_place_order().once().return_once(|_, _| {
            Err(CheckoutServiceError::Payment {
                order: OrderUuid::new(),
                source: PaymentGatewayError::UnexpectedResponse("status 503".to_string()),
            })
        });

        let res = TestClient::post("http://example.com/orders")
            .json(&body("online"))
            .send(&make_service(checkout))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_GATEWAY));

        Ok(())
    }

    #[test]
    fn commit_outcomes_name_the_rejection() {
        let exhausted: Result<PlacedOrder, CheckoutServiceError> = Err(
            OrdersServiceError::CouponExhausted("SAVE50".to_string()).into(),
        );
        let placed: Result<PlacedOrder, CheckoutServiceError> = Ok(PlacedOrder {
            order: make_order(OrderUuid::new()),
            payment: None,
        });

        assert_eq!(commit_outcome(&exhausted), "coupon_exhausted");
        assert_eq!(commit_outcome(&placed), "committed");
    }
}
