//! Resolve Outlet Handler

use salvo::{
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use storefront::outlets::GeoPoint;

use crate::{
    checkout::{
        into_status_error,
        models::{LinePayload, LocationPayload, OutletResponse, into_lines},
    },
    extensions::*,
};

/// Outlet Lookup Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct OutletLookupRequest {
    pub lines: Vec<LinePayload>,

    /// Delivery location; without it the first stocked outlet is chosen
    pub location: Option<LocationPayload>,
}

/// Resolve Outlet Handler
///
/// Finds the nearest active outlet holding stock for every regular line.
#[endpoint(
    tags("checkout"),
    summary = "Resolve Fulfillment Outlet",
    responses(
        (status_code = 200, description = "Outlet found"),
        (status_code = 404, description = "Unknown variant"),
        (status_code = 409, description = "No outlet can fulfill the cart"),
        (status_code = 500, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<OutletLookupRequest>,
    depot: &mut Depot,
) -> Result<Json<OutletResponse>, StatusError> {
    let request = json.into_inner();

    let outlet = depot
        .app_or_500()?
        .checkout
        .resolve_outlet(
            into_lines(request.lines),
            request.location.map(GeoPoint::from),
        )
        .await
        .map_err(into_status_error)?;

    Ok(Json(outlet.into()))
}
