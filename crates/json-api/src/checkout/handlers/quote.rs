//! Quote Checkout Handler

use salvo::{oapi::extract::JsonBody, prelude::*};

use crate::{
    checkout::{
        into_status_error,
        models::{CheckoutPayload, QuoteResponse},
    },
    extensions::*,
};

/// Quote Checkout Handler
///
/// Prices a cart on any channel without committing it. A coupon that does not
/// apply is reported in the quote rather than failing it.
#[endpoint(
    tags("checkout"),
    summary = "Quote Checkout",
    responses(
        (status_code = 200, description = "Cart priced"),
        (status_code = 400, description = "Bad Request"),
        (status_code = 404, description = "Unknown customer, variant or gift card"),
        (status_code = 422, description = "Cart cannot be checked out"),
        (status_code = 500, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<CheckoutPayload>,
    depot: &mut Depot,
) -> Result<Json<QuoteResponse>, StatusError> {
    let request = json.into_inner().into_request()?;

    let quote = depot
        .app_or_500()?
        .checkout
        .quote(request)
        .await
        .map_err(into_status_error)?;

    Ok(Json(quote.into()))
}
