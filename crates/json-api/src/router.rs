//! App Router

use salvo::Router;

use crate::{checkout, orders};

pub(crate) fn app_router() -> Router {
    Router::new()
        .push(
            Router::with_path("checkout")
                .push(Router::with_path("quote").post(checkout::quote::handler))
                .push(Router::with_path("coupons").post(checkout::coupons::handler))
                .push(Router::with_path("outlets").post(checkout::outlets::handler)),
        )
        .push(
            Router::with_path("orders")
                .post(orders::create::handler)
                .push(Router::with_path("{order}").get(orders::get::handler)),
        )
}
