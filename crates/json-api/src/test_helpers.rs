//! Test helpers.

use std::sync::Arc;

use jiff::Timestamp;
use rusty_money::{Money, iso::BDT};
use salvo::{affix_state::inject, prelude::*};
use uuid::Uuid;

use storefront::{
    cart::{Cart, CartLine},
    channels::CheckoutChannel,
    orders::{OrderStatus, OrderType, PaymentMethod, PaymentStatus},
    pricing::{DiscountContext, PricingError, compute_totals},
    products::{ProductId, Sku},
    shipping::{ShippingQuote, ShippingTier},
};
use storefront_app::{
    context::AppContext,
    domain::{
        catalog::records::ProductUuid,
        checkout::{MockCheckoutService, data::{CheckoutQuote, FulfillmentOutlet}},
        customers::records::CustomerUuid,
        orders::{
            MockOrdersService,
            records::{OrderItemRecord, OrderItemUuid, OrderRecord, OrderUuid},
        },
        outlets::records::OutletUuid,
    },
};

use crate::state::State;

fn strict_checkout_mock() -> MockCheckoutService {
    let mut checkout = MockCheckoutService::new();

    checkout.expect_quote().never();
    checkout.expect_validate_coupon().never();
    checkout.expect_resolve_outlet().never();
    checkout.expect_place_order().never();

    checkout
}

fn strict_orders_mock() -> MockOrdersService {
    let mut orders = MockOrdersService::new();

    orders.expect_commit_order().never();
    orders.expect_get_order().never();

    orders
}

fn service(checkout: MockCheckoutService, orders: MockOrdersService, route: Router) -> Service {
    let state = State::from_app_context(AppContext {
        checkout: Arc::new(checkout),
        orders: Arc::new(orders),
    });

    Service::new(Router::new().hoop(inject(state)).push(route))
}

pub(crate) fn checkout_service(checkout: MockCheckoutService, route: Router) -> Service {
    service(checkout, strict_orders_mock(), route)
}

pub(crate) fn orders_service(orders: MockOrdersService, route: Router) -> Service {
    service(strict_checkout_mock(), orders, route)
}

/// Two ৳500 tees delivered inside Dhaka from Gulshan.
pub(crate) fn make_quote() -> Result<CheckoutQuote, PricingError> {
    let cart = Cart::with_lines(
        [CartLine::regular(
            ProductId::from_uuid(Uuid::nil()),
            Sku::new("TEE-M"),
            "Tee",
            2,
            Money::from_minor(50_000, BDT),
        )],
        BDT,
    )?;

    let fee = Money::from_minor(6_000, BDT);
    let breakdown = compute_totals(&cart, &DiscountContext::new(100, Timestamp::now()))?
        .with_shipping(&fee);

    Ok(CheckoutQuote {
        breakdown,
        outlet: Some(FulfillmentOutlet {
            uuid: OutletUuid::from_uuid(Uuid::from_u128(1)),
            name: "Gulshan".to_string(),
            district: "Dhaka".to_string(),
            distance_km: Some(7.5),
            express_eligible: false,
        }),
        shipping: ShippingQuote {
            tier: ShippingTier::InsideDistrict,
            fee,
            estimate_days: ShippingTier::InsideDistrict.estimate_days(),
        },
    })
}

/// A cash-on-delivery order for the same two tees.
pub(crate) fn make_order(uuid: OrderUuid) -> OrderRecord {
    OrderRecord {
        uuid,
        customer_uuid: CustomerUuid::from_uuid(Uuid::nil()),
        channel: CheckoutChannel::Storefront,
        order_type: OrderType::Regular,
        status: OrderStatus::New,
        payment_status: PaymentStatus::Unpaid,
        payment_method: PaymentMethod::CashOnDelivery,
        currency: "BDT".to_string(),
        subtotal: 100_000,
        card_promo_discount_amount: 0,
        discount_amount: 0,
        promo_code: None,
        loyalty_points_used: 0,
        loyalty_discount: 0,
        gift_card_code: None,
        gift_card_discount: 0,
        shipping_fee: 6_000,
        total_amount: 106_000,
        full_order_value: 100_000,
        assigned_outlet_uuid: Some(OutletUuid::from_uuid(Uuid::from_u128(1))),
        items: vec![OrderItemRecord {
            uuid: OrderItemUuid::new(),
            product_uuid: ProductUuid::from_uuid(Uuid::nil()),
            sku: "TEE-M".to_string(),
            name: "Tee".to_string(),
            quantity: 2,
            unit_price: 50_000,
            is_pre_order: false,
            payable_now: 100_000,
        }],
        created_at: Timestamp::UNIX_EPOCH,
        updated_at: Timestamp::UNIX_EPOCH,
    }
}
