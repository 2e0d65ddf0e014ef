//! Validate Coupon Handler

use salvo::{
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};

use crate::{
    checkout::{
        into_status_error,
        models::{CouponResponse, LinePayload, into_lines},
    },
    extensions::*,
};

/// Coupon Check Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CouponCheckRequest {
    /// Code as typed by the customer
    pub code: String,

    pub lines: Vec<LinePayload>,
}

/// Validate Coupon Handler
///
/// Checks a coupon code against a cart; a rejected code answers 422 with the reason.
#[endpoint(
    tags("checkout"),
    summary = "Validate Coupon",
    responses(
        (status_code = 200, description = "Coupon applies"),
        (status_code = 404, description = "Unknown variant"),
        (status_code = 422, description = "Coupon rejected"),
        (status_code = 500, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<CouponCheckRequest>,
    depot: &mut Depot,
) -> Result<Json<CouponResponse>, StatusError> {
    let request = json.into_inner();

    let coupon = depot
        .app_or_500()?
        .checkout
        .validate_coupon(into_lines(request.lines), request.code)
        .await
        .map_err(into_status_error)?;

    Ok(Json(coupon.into()))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::json;
    use storefront::coupons::{AppliedCoupon, CouponRejection};
    use storefront_app::domain::checkout::{CheckoutServiceError, MockCheckoutService};
    use testresult::TestResult;
    use uuid::Uuid;

    use crate::test_helpers::checkout_service;

    use super::*;

    fn make_service(checkout: MockCheckoutService) -> Service {
        checkout_service(checkout, Router::with_path("checkout/coupons").post(handler))
    }

    fn body() -> serde_json::Value {
        json!({
            "code": "save50",
            "lines": [{ "product": Uuid::nil(), "sku": "TEE-M", "quantity": 1 }]
        })
    }

    #[tokio::test]
    async fn test_valid_coupon_returns_discount() -> TestResult {
        let mut checkout = MockCheckoutService::new();

        checkout
            .expect_validate_coupon()
            .once()
            .withf(|lines, code| lines.len() == 1 && code == "save50")
            .return_once(|_, _| {
                Ok(AppliedCoupon {
                    code: "SAVE50".to_string(),
                    eligible_subtotal: 50_000,
                    discount: 5_000,
                })
            });

        let response: CouponResponse = TestClient::post("http://example.com/checkout/coupons")
            .json(&body())
            .send(&make_service(checkout))
            .await
            .take_json()
            .await?;

        assert_eq!(
            response,
            CouponResponse {
                code: "SAVE50".to_string(),
                eligible_subtotal: 50_000,
                discount: 5_000,
            }
        );

        Ok(())
    }

    #[tokio::test]
    async fn test_rejected_coupon_returns_422() -> TestResult {
        let mut checkout = MockCheckoutService::new();

        checkout
            .expect_validate_coupon()
            .once()
            .return_once(|_, _| Err(CheckoutServiceError::Coupon(CouponRejection::Expired)));

        let res = TestClient::post("http://example.com/checkout/coupons")
            .json(&body())
            .send(&make_service(checkout))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::UNPROCESSABLE_ENTITY));

        Ok(())
    }
}
