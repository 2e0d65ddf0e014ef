//! Checkout service.

use std::sync::Arc;

use async_trait::async_trait;
use jiff::Timestamp;
use mockall::automock;
use storefront::{
    cart::{Cart, CartAction},
    channels::CheckoutChannel,
    coupons::{AppliedCoupon, normalize_code, validate_coupon},
    customers::CustomerId,
    fulfillment::{
        EXPRESS_RADIUS_KM, FulfillmentError, Inventory, OutletSelection, check_outlet,
        resolve_outlet,
    },
    gift_cards::GiftCardError,
    orders::{CheckoutError, OrderDraft, PaymentMethod},
    outlets::{GeoPoint, Outlet, OutletId},
    pricing::{DiscountContext, compute_totals},
    products::{ProductId, Sku},
    shipping::quote_shipping,
};
use tracing::{info, warn};

use crate::{
    domain::{
        catalog::{CatalogService, data::VariantKey},
        checkout::{
            data::{
                CheckoutLine, CheckoutQuote, CheckoutRequest, CheckoutSettings, DeliveryAddress,
                FulfillmentOutlet, PlacedOrder,
            },
            errors::CheckoutServiceError,
        },
        coupons::CouponsService,
        customers::{CustomersService, records::CustomerRecord},
        gift_cards::GiftCardsService,
        orders::{OrdersService, records::OrderUuid},
        outlets::{
            OutletsService, OutletsServiceError,
            records::{OutletRecord, OutletUuid},
        },
    },
    payments::PaymentGateway,
};

/// Services a checkout reads from and writes through.
#[derive(Clone)]
pub struct CheckoutCollaborators {
    pub catalog: Arc<dyn CatalogService>,
    pub outlets: Arc<dyn OutletsService>,
    pub customers: Arc<dyn CustomersService>,
    pub coupons: Arc<dyn CouponsService>,
    pub gift_cards: Arc<dyn GiftCardsService>,
    pub orders: Arc<dyn OrdersService>,
    pub payments: Arc<dyn PaymentGateway>,
}

#[derive(Clone)]
pub struct StorefrontCheckoutService {
    services: CheckoutCollaborators,
    settings: CheckoutSettings,
}

struct PricedCheckout {
    cart: Cart<'static>,
    customer: CustomerRecord,
    quote: CheckoutQuote,
}

impl StorefrontCheckoutService {
    #[must_use]
    pub fn new(services: CheckoutCollaborators, settings: CheckoutSettings) -> Self {
        Self { services, settings }
    }

    /// Build the cart and its stock snapshot from catalog variants.
    async fn load_cart(
        &self,
        lines: &[CheckoutLine],
    ) -> Result<(Cart<'static>, Inventory), CheckoutServiceError> {
        let keys = lines
            .iter()
            .map(|line| VariantKey {
                product: line.product,
                sku: line.sku.clone(),
            })
            .collect();

        let variants = self.services.catalog.get_variants(keys).await?;

        let mut cart = Cart::new(self.settings.currency);
        let mut inventory = Inventory::default();

        for line in lines {
            let variant = variants
                .iter()
                .find(|variant| variant.product_uuid == line.product && variant.sku == line.sku)
                .ok_or_else(|| CheckoutServiceError::UnknownVariant(line.sku.clone()))?;

            cart = cart.apply(CartAction::Add(
                variant.to_line(line.quantity, self.settings.currency),
            ))?;

            inventory.insert(
                ProductId::from_uuid(variant.product_uuid.into_uuid()),
                Sku::new(variant.sku.clone()),
                variant.to_stock(),
            );
        }

        Ok((cart, inventory))
    }

    async fn active_outlets(&self) -> Result<Vec<Outlet>, CheckoutServiceError> {
        let records = self.services.outlets.list_active_outlets().await?;

        Ok(records.iter().map(OutletRecord::to_outlet).collect())
    }

    async fn pinned_outlet(&self, uuid: OutletUuid) -> Result<Outlet, CheckoutServiceError> {
        match self.services.outlets.get_outlet(uuid).await {
            Ok(record) => Ok(record.to_outlet()),
            Err(OutletsServiceError::NotFound) => Err(FulfillmentError::OutletNotFound(
                OutletId::from_uuid(uuid.into_uuid()),
            )
            .into()),
            Err(error) => Err(error.into()),
        }
    }

    async fn context(
        &self,
        request: &CheckoutRequest,
        customer: &CustomerRecord,
        now: Timestamp,
    ) -> Result<DiscountContext<'static>, CheckoutServiceError> {
        let currency = self.settings.currency;
        let profile = customer.to_profile();

        let mut context = DiscountContext::new(self.settings.point_value, now)
            .with_card_promo(profile.card_promo)
            .with_points(request.points, profile.loyalty_points);

        if let Some(code) = non_blank(request.coupon_code.as_deref()) {
            let coupon = self
                .services
                .coupons
                .find_coupon(code.to_string())
                .await?
                .map(|record| record.to_coupon(currency));

            context = context.with_coupon(code, coupon);
        }

        if let Some(code) = non_blank(request.gift_card_code.as_deref()) {
            let card = self
                .services
                .gift_cards
                .find_gift_card(code.to_string())
                .await?
                .ok_or_else(|| GiftCardError::NotFound(normalize_code(code)))?
                .to_gift_card(currency);

            card.ensure_usable(now)?;

            context = context.with_gift_card(card);
        }

        Ok(context)
    }

    async fn price(
        &self,
        request: &CheckoutRequest,
    ) -> Result<PricedCheckout, CheckoutServiceError> {
        let (cart, inventory) = self.load_cart(&request.lines).await?;

        cart.ensure_checkout_ready(request.channel)?;

        let customer = self.services.customers.get_customer(request.customer).await?;

        let now = Timestamp::now();
        let context = self.context(request, &customer, now).await?;
        let breakdown = compute_totals(&cart, &context)?;

        let delivery = request.delivery.clone().or_else(|| {
            customer.addresses.first().map(|address| DeliveryAddress {
                district: address.district.clone(),
                location: address.to_address().location,
            })
        });

        let location = delivery.as_ref().and_then(|delivery| delivery.location);

        let outlets = match request.outlet {
            Some(uuid) => vec![self.pinned_outlet(uuid).await?],
            None if request.channel == CheckoutChannel::OutletPos => {
                return Err(CheckoutError::OutletRequired.into());
            }
            None => self.active_outlets().await?,
        };

        let selection = match (request.outlet, outlets.first()) {
            (Some(_), Some(outlet)) => {
                check_outlet(&cart, outlet, &inventory)?;

                Some(pinned_selection(outlet, location))
            }
            _ => resolve_outlet(&cart, &outlets, &inventory, location),
        };

        let shipping = quote_shipping(
            request.channel,
            &cart,
            selection.as_ref(),
            delivery.as_ref().map(|delivery| delivery.district.as_str()),
            &self.settings.shipping_rates,
        );

        let quote = CheckoutQuote {
            breakdown: breakdown.with_shipping(&shipping.fee),
            outlet: selection.as_ref().map(fulfillment_outlet),
            shipping,
        };

        Ok(PricedCheckout {
            cart,
            customer,
            quote,
        })
    }
}

fn non_blank(code: Option<&str>) -> Option<&str> {
    code.filter(|code| !code.trim().is_empty())
}

fn pinned_selection(outlet: &Outlet, customer: Option<GeoPoint>) -> OutletSelection<'_> {
    let distance_km = customer.map(|point| point.distance_km(&outlet.location));

    OutletSelection {
        outlet,
        distance_km,
        express_eligible: distance_km.is_some_and(|distance| distance <= EXPRESS_RADIUS_KM),
    }
}

fn fulfillment_outlet(selection: &OutletSelection<'_>) -> FulfillmentOutlet {
    FulfillmentOutlet {
        uuid: selection.outlet.id.into(),
        name: selection.outlet.name.clone(),
        district: selection.outlet.district.clone(),
        distance_km: selection.distance_km,
        express_eligible: selection.express_eligible,
    }
}

#[async_trait]
impl CheckoutService for StorefrontCheckoutService {
    #[tracing::instrument(
        name = "checkout.service.quote",
        skip(self, request),
        fields(customer_uuid = %request.customer, channel = %request.channel),
        err
    )]
    async fn quote(&self, request: CheckoutRequest) -> Result<CheckoutQuote, CheckoutServiceError> {
        Ok(self.price(&request).await?.quote)
    }

    #[tracing::instrument(name = "checkout.service.validate_coupon", skip(self, lines), err)]
    async fn validate_coupon(
        &self,
        lines: Vec<CheckoutLine>,
        code: String,
    ) -> Result<AppliedCoupon, CheckoutServiceError> {
        let (cart, _) = self.load_cart(&lines).await?;

        let coupon = self
            .services
            .coupons
            .find_coupon(code)
            .await?
            .map(|record| record.to_coupon(self.settings.currency));

        Ok(validate_coupon(coupon.as_ref(), &cart, Timestamp::now())?)
    }

    #[tracing::instrument(name = "checkout.service.resolve_outlet", skip(self, lines), err)]
    async fn resolve_outlet(
        &self,
        lines: Vec<CheckoutLine>,
        location: Option<GeoPoint>,
    ) -> Result<FulfillmentOutlet, CheckoutServiceError> {
        let (cart, inventory) = self.load_cart(&lines).await?;
        let outlets = self.active_outlets().await?;

        let selection = resolve_outlet(&cart, &outlets, &inventory, location)
            .ok_or(FulfillmentError::NoFulfillingOutlet)?;

        Ok(fulfillment_outlet(&selection))
    }

    #[tracing::instrument(
        name = "checkout.service.place_order",
        skip(self, request),
        fields(customer_uuid = %request.customer, channel = %request.channel),
        err
    )]
    async fn place_order(
        &self,
        request: CheckoutRequest,
        payment_method: PaymentMethod,
    ) -> Result<PlacedOrder, CheckoutServiceError> {
        let PricedCheckout {
            cart,
            customer,
            quote,
        } = self.price(&request).await?;

        if let Some(rejection) = quote.breakdown.coupon_rejection() {
            return Err(CheckoutServiceError::Coupon(rejection.clone()));
        }

        let outlet = quote
            .outlet
            .as_ref()
            .map(|outlet| OutletId::from_uuid(outlet.uuid.into_uuid()));

        let draft = match OrderDraft::prepare(
            &cart,
            quote.breakdown,
            CustomerId::from_uuid(request.customer.into_uuid()),
            outlet,
            payment_method,
            request.channel,
        ) {
            Ok(draft) => draft,
            // Only reachable when the resolver found no outlet for the regular lines.
            Err(CheckoutError::OutletRequired) => {
                return Err(FulfillmentError::NoFulfillingOutlet.into());
            }
            Err(error) => return Err(error.into()),
        };

        let order = self
            .services
            .orders
            .commit_order(OrderUuid::new(), draft)
            .await?;

        if payment_method != PaymentMethod::Online {
            return Ok(PlacedOrder {
                order,
                payment: None,
            });
        }

        match self
            .services
            .payments
            .create_payment_session(&order, &customer, order.total_amount)
            .await
        {
            Ok(session) => {
                info!(order_uuid = %order.uuid, "created payment session");

                Ok(PlacedOrder {
                    order,
                    payment: Some(session),
                })
            }
            Err(source) => {
                warn!(order_uuid = %order.uuid, error = %source, "payment session failed");

                Err(CheckoutServiceError::Payment {
                    order: order.uuid,
                    source,
                })
            }
        }
    }
}

#[automock]
#[async_trait]
pub trait CheckoutService: Send + Sync {
    /// Price a cart on any channel, including the summary channel.
    async fn quote(&self, request: CheckoutRequest) -> Result<CheckoutQuote, CheckoutServiceError>;

    /// Check a coupon code against a cart without applying it.
    async fn validate_coupon(
        &self,
        lines: Vec<CheckoutLine>,
        code: String,
    ) -> Result<AppliedCoupon, CheckoutServiceError>;

    /// Outlet that would fulfill a cart delivered near `location`.
    async fn resolve_outlet(
        &self,
        lines: Vec<CheckoutLine>,
        location: Option<GeoPoint>,
    ) -> Result<FulfillmentOutlet, CheckoutServiceError>;

    /// Price a cart, commit the order and open a payment session for online payments.
    async fn place_order(
        &self,
        request: CheckoutRequest,
        payment_method: PaymentMethod,
    ) -> Result<PlacedOrder, CheckoutServiceError>;
}

#[cfg(test)]
mod tests {
    use jiff::ToSpan;
    use rustc_hash::FxHashMap;
    use storefront::{
        coupons::CouponRejection,
        orders::{OrderStatus, OrderType},
        outlets::OutletStatus,
        shipping::ShippingTier,
    };
    use testresult::TestResult;
    use uuid::Uuid;

    use super::*;
    use crate::{
        domain::{
            catalog::{
                MockCatalogService,
                records::{ProductUuid, VariantRecord, VariantUuid},
            },
            coupons::{
                MockCouponsService,
                records::{CouponRecord, CouponUuid, CouponValue},
            },
            customers::{
                MockCustomersService,
                records::{AddressRecord, AddressUuid, CustomerUuid},
            },
            gift_cards::MockGiftCardsService,
            orders::{MockOrdersService, records::OrderRecord},
            outlets::MockOutletsService,
        },
        payments::{MockPaymentGateway, PaymentGatewayError, PaymentSession},
        test::{
            TestContext,
            helpers::{
                add_address, create_customer, create_outlet, create_product, outlet_stock,
                set_outlet_stock,
            },
        },
    };

    const GULSHAN: (f64, f64) = (23.7925, 90.4078);
    const DHANMONDI: (f64, f64) = (23.7461, 90.3742);
    const NEAR_GULSHAN: (f64, f64) = (23.7900, 90.4100);

    fn shirt() -> ProductUuid {
        ProductUuid::from_uuid(Uuid::from_u128(1))
    }

    fn customer_uuid() -> CustomerUuid {
        CustomerUuid::from_uuid(Uuid::from_u128(2))
    }

    fn outlet(n: u128, name: &str, (latitude, longitude): (f64, f64)) -> OutletRecord {
        OutletRecord {
            uuid: OutletUuid::from_uuid(Uuid::from_u128(100 + n)),
            name: name.to_string(),
            status: OutletStatus::Active,
            latitude,
            longitude,
            address: String::new(),
            district: "Dhaka".to_string(),
        }
    }

    fn gulshan() -> OutletRecord {
        outlet(1, "Gulshan", GULSHAN)
    }

    fn dhanmondi() -> OutletRecord {
        outlet(2, "Dhanmondi", DHANMONDI)
    }

    fn variant(stocks: &[(&OutletRecord, i64)]) -> VariantRecord {
        let outlet_stocks: FxHashMap<OutletUuid, i64> = stocks
            .iter()
            .map(|(outlet, quantity)| (outlet.uuid, *quantity))
            .collect();

        VariantRecord {
            uuid: VariantUuid::from_uuid(Uuid::from_u128(10)),
            product_uuid: shirt(),
            sku: "SHIRT-M".to_string(),
            name: "Shirt".to_string(),
            price: 50_000,
            stock: outlet_stocks.values().sum(),
            is_pre_order: false,
            deposit: None,
            outlet_stocks,
        }
    }

    fn customer(loyalty_points: i64, card_promo_bps: u32) -> CustomerRecord {
        CustomerRecord {
            uuid: customer_uuid(),
            name: "Nadia".to_string(),
            loyalty_points,
            card_promo_bps,
            membership_tier: None,
            addresses: vec![AddressRecord {
                uuid: AddressUuid::from_uuid(Uuid::from_u128(3)),
                line: "Road 11".to_string(),
                district: "Dhaka".to_string(),
                latitude: Some(NEAR_GULSHAN.0),
                longitude: Some(NEAR_GULSHAN.1),
            }],
        }
    }

    fn request(channel: CheckoutChannel, quantity: u32) -> CheckoutRequest {
        CheckoutRequest {
            channel,
            customer: customer_uuid(),
            lines: vec![CheckoutLine {
                product: shirt(),
                sku: "SHIRT-M".to_string(),
                quantity,
            }],
            coupon_code: None,
            gift_card_code: None,
            points: 0,
            outlet: None,
            delivery: None,
        }
    }

    fn committed(uuid: OrderUuid, draft: &OrderDraft) -> OrderRecord {
        let breakdown = &draft.breakdown;

        OrderRecord {
            uuid,
            customer_uuid: draft.customer.into(),
            channel: draft.channel,
            order_type: draft.order_type,
            status: draft.status,
            payment_status: draft.payment_status,
            payment_method: draft.payment_method,
            currency: breakdown.currency().iso_alpha_code.to_string(),
            subtotal: breakdown.subtotal().to_minor_units(),
            card_promo_discount_amount: breakdown.card_discount().to_minor_units(),
            discount_amount: breakdown.coupon_discount().to_minor_units(),
            promo_code: breakdown.coupon_code().map(str::to_string),
            loyalty_points_used: breakdown.points_applied(),
            loyalty_discount: breakdown.points_discount().to_minor_units(),
            gift_card_code: breakdown.gift_card_code().map(str::to_string),
            gift_card_discount: breakdown.gift_card_discount().to_minor_units(),
            shipping_fee: breakdown.shipping_fee().to_minor_units(),
            total_amount: breakdown.total_amount().to_minor_units(),
            full_order_value: breakdown.full_order_value().to_minor_units(),
            assigned_outlet_uuid: draft.outlet.map(Into::into),
            items: Vec::new(),
            created_at: Timestamp::now(),
            updated_at: Timestamp::now(),
        }
    }

    #[derive(Default)]
    struct Mocks {
        catalog: MockCatalogService,
        outlets: MockOutletsService,
        customers: MockCustomersService,
        coupons: MockCouponsService,
        gift_cards: MockGiftCardsService,
        orders: MockOrdersService,
        payments: MockPaymentGateway,
    }

    impl Mocks {
        /// Catalog, directory and customer answering for a shirt stocked at both outlets.
        fn stocked(gulshan_stock: i64, dhanmondi_stock: i64) -> Self {
            let mut mocks = Self::default();
            let variant = variant(&[(&gulshan(), gulshan_stock), (&dhanmondi(), dhanmondi_stock)]);

            mocks
                .catalog
                .expect_get_variants()
                .returning(move |_| Ok(vec![variant.clone()]));

            mocks
                .outlets
                .expect_list_active_outlets()
                .returning(|| Ok(vec![dhanmondi(), gulshan()]));

            mocks
                .customers
                .expect_get_customer()
                .returning(|_| Ok(customer(1_000, 1_000)));

            mocks
        }

        fn service(self) -> StorefrontCheckoutService {
            StorefrontCheckoutService::new(
                CheckoutCollaborators {
                    catalog: Arc::new(self.catalog),
                    outlets: Arc::new(self.outlets),
                    customers: Arc::new(self.customers),
                    coupons: Arc::new(self.coupons),
                    gift_cards: Arc::new(self.gift_cards),
                    orders: Arc::new(self.orders),
                    payments: Arc::new(self.payments),
                },
                CheckoutSettings::default(),
            )
        }
    }

    fn coupon(code: &str, expires_at: Timestamp) -> CouponRecord {
        CouponRecord {
            uuid: CouponUuid::from_uuid(Uuid::from_u128(20)),
            code: code.to_string(),
            value: CouponValue::Fixed { amount: 5_000 },
            minimum_spend: 0,
            expires_at,
            usage_limit: 10,
            used_count: 0,
            products: Vec::new(),
        }
    }

    #[tokio::test]
    async fn quote_applies_every_stage_and_ships_express_from_nearest_outlet() -> TestResult {
        let mut mocks = Mocks::stocked(5, 5);

        mocks
            .coupons
            .expect_find_coupon()
            .withf(|code| code == "save50")
            .returning(|_| Ok(Some(coupon("SAVE50", Timestamp::now() + 24.hours()))));

        let service = mocks.service();

        let mut request = request(CheckoutChannel::Storefront, 2);
        request.coupon_code = Some("save50".to_string());
        request.points = 10;

        let quote = service.quote(request).await?;
        let breakdown = &quote.breakdown;

        assert_eq!(breakdown.regular_subtotal().to_minor_units(), 100_000);
        assert_eq!(breakdown.card_discount().to_minor_units(), 10_000);
        assert_eq!(breakdown.coupon_discount().to_minor_units(), 5_000);
        assert_eq!(breakdown.coupon_code(), Some("SAVE50"));
        assert_eq!(breakdown.points_applied(), 10);
        assert_eq!(breakdown.points_discount().to_minor_units(), 1_000);
        assert_eq!(breakdown.grand_total().to_minor_units(), 84_000);
        assert_eq!(breakdown.shipping_fee().to_minor_units(), 4_000);
        assert_eq!(breakdown.total_amount().to_minor_units(), 88_000);

        let outlet = quote.outlet.ok_or("expected an outlet")?;

        assert_eq!(outlet.uuid, gulshan().uuid);
        assert!(outlet.express_eligible);
        assert_eq!(quote.shipping.tier, ShippingTier::Express);

        Ok(())
    }

    #[tokio::test]
    async fn quote_reports_rejected_coupon_without_failing() -> TestResult {
        let mut mocks = Mocks::stocked(5, 5);

        mocks
            .coupons
            .expect_find_coupon()
            .returning(|_| Ok(Some(coupon("OLD", Timestamp::now() - 1.hour()))));

        let mut request = request(CheckoutChannel::Summary, 1);
        request.coupon_code = Some("old".to_string());

        let quote = mocks.service().quote(request).await?;

        assert_eq!(quote.breakdown.coupon_discount().to_minor_units(), 0);
        assert_eq!(
            quote.breakdown.coupon_rejection(),
            Some(&CouponRejection::Expired)
        );

        Ok(())
    }

    #[tokio::test]
    async fn quote_skips_outlets_without_full_stock() -> TestResult {
        let service = Mocks::stocked(1, 5).service();

        let quote = service.quote(request(CheckoutChannel::Storefront, 3)).await?;
        let outlet = quote.outlet.ok_or("expected an outlet")?;

        assert_eq!(outlet.uuid, dhanmondi().uuid);
        assert!(!outlet.express_eligible);
        assert_eq!(quote.shipping.tier, ShippingTier::InsideDistrict);

        Ok(())
    }

    #[tokio::test]
    async fn quote_unknown_variant_is_rejected() {
        let mut mocks = Mocks::default();

        mocks.catalog.expect_get_variants().returning(|_| Ok(Vec::new()));

        let result = mocks
            .service()
            .quote(request(CheckoutChannel::Storefront, 1))
            .await;

        assert!(
            matches!(&result, Err(CheckoutServiceError::UnknownVariant(sku)) if sku == "SHIRT-M"),
            "expected UnknownVariant, got {result:?}"
        );
    }

    #[tokio::test]
    async fn quote_unknown_gift_card_is_rejected() {
        let mut mocks = Mocks::stocked(5, 5);

        mocks.gift_cards.expect_find_gift_card().returning(|_| Ok(None));

        let mut request = request(CheckoutChannel::Storefront, 1);
        request.gift_card_code = Some(" gift-1 ".to_string());

        let result = mocks.service().quote(request).await;

        assert!(
            matches!(
                &result,
                Err(CheckoutServiceError::GiftCard(GiftCardError::NotFound(code))) if code == "GIFT-1"
            ),
            "expected GiftCard NotFound, got {result:?}"
        );
    }

    #[tokio::test]
    async fn outlet_pos_needs_its_outlet() {
        let result = Mocks::stocked(5, 5)
            .service()
            .quote(request(CheckoutChannel::OutletPos, 1))
            .await;

        assert!(
            matches!(
                result,
                Err(CheckoutServiceError::Checkout(CheckoutError::OutletRequired))
            ),
            "expected OutletRequired, got {result:?}"
        );
    }

    #[tokio::test]
    async fn pinned_inactive_outlet_is_rejected() {
        let mut mocks = Mocks::stocked(5, 5);

        mocks.outlets.expect_get_outlet().returning(|_| {
            Ok(OutletRecord {
                status: OutletStatus::Inactive,
                ..gulshan()
            })
        });

        let mut request = request(CheckoutChannel::SalesRep, 1);
        request.outlet = Some(gulshan().uuid);

        let result = mocks.service().quote(request).await;

        assert!(
            matches!(
                result,
                Err(CheckoutServiceError::Fulfillment(FulfillmentError::OutletInactive(_)))
            ),
            "expected OutletInactive, got {result:?}"
        );
    }

    #[tokio::test]
    async fn outlet_pos_sale_is_collected_at_the_counter() -> TestResult {
        let mut mocks = Mocks::stocked(5, 0);

        mocks
            .outlets
            .expect_get_outlet()
            .returning(|_| Ok(gulshan()));

        mocks
            .orders
            .expect_commit_order()
            .times(1)
            .returning(|uuid, draft| Ok(committed(uuid, &draft)));

        let mut request = request(CheckoutChannel::OutletPos, 1);
        request.outlet = Some(gulshan().uuid);

        let placed = mocks.service().place_order(request, PaymentMethod::Cash).await?;

        assert_eq!(placed.order.shipping_fee, 0);
        assert_eq!(placed.order.status, OrderStatus::New);
        assert_eq!(placed.order.assigned_outlet_uuid, Some(gulshan().uuid));
        assert_eq!(placed.payment, None);

        Ok(())
    }

    #[tokio::test]
    async fn place_order_without_fulfilling_outlet_commits_nothing() {
        let mut mocks = Mocks::stocked(1, 2);

        mocks.orders.expect_commit_order().never();

        let result = mocks
            .service()
            .place_order(
                request(CheckoutChannel::Storefront, 3),
                PaymentMethod::CashOnDelivery,
            )
            .await;

        assert!(
            matches!(
                result,
                Err(CheckoutServiceError::Fulfillment(FulfillmentError::NoFulfillingOutlet))
            ),
            "expected NoFulfillingOutlet, got {result:?}"
        );
    }

    #[tokio::test]
    async fn place_order_with_rejected_coupon_commits_nothing() {
        let mut mocks = Mocks::stocked(5, 5);

        mocks
            .coupons
            .expect_find_coupon()
            .returning(|_| Ok(Some(coupon("OLD", Timestamp::now() - 1.hour()))));
        mocks.orders.expect_commit_order().never();

        let mut request = request(CheckoutChannel::Storefront, 1);
        request.coupon_code = Some("old".to_string());

        let result = mocks
            .service()
            .place_order(request, PaymentMethod::CashOnDelivery)
            .await;

        assert!(
            matches!(
                result,
                Err(CheckoutServiceError::Coupon(CouponRejection::Expired))
            ),
            "expected an expired coupon rejection, got {result:?}"
        );
    }

    #[tokio::test]
    async fn summary_channel_never_commits() {
        let mut mocks = Mocks::stocked(5, 5);

        mocks.orders.expect_commit_order().never();

        let result = mocks
            .service()
            .place_order(request(CheckoutChannel::Summary, 1), PaymentMethod::Online)
            .await;

        assert!(
            matches!(
                result,
                Err(CheckoutServiceError::Checkout(CheckoutError::SummaryCannotCommit))
            ),
            "expected SummaryCannotCommit, got {result:?}"
        );
    }

    #[tokio::test]
    async fn online_order_opens_payment_session_for_total() -> TestResult {
        let mut mocks = Mocks::stocked(5, 5);

        mocks
            .orders
            .expect_commit_order()
            .times(1)
            .returning(|uuid, draft| Ok(committed(uuid, &draft)));

        mocks
            .payments
            .expect_create_payment_session()
            .withf(|order, customer, amount| {
                *amount == order.total_amount && customer.uuid == customer_uuid()
            })
            .times(1)
            .returning(|_, _, _| {
                Ok(PaymentSession {
                    redirect_url: "https://pay.example.com/s/1".to_string(),
                })
            });

        let placed = mocks
            .service()
            .place_order(request(CheckoutChannel::Storefront, 1), PaymentMethod::Online)
            .await?;

        assert_eq!(placed.order.status, OrderStatus::PendingPayment);
        assert_eq!(placed.order.order_type, OrderType::Regular);
        assert_eq!(
            placed.payment.map(|session| session.redirect_url).as_deref(),
            Some("https://pay.example.com/s/1")
        );

        Ok(())
    }

    #[tokio::test]
    async fn payment_failure_reports_the_committed_order() {
        let mut mocks = Mocks::stocked(5, 5);
        let placed = OrderUuid::from_uuid(Uuid::from_u128(99));

        mocks
            .orders
            .expect_commit_order()
            .returning(move |_, draft| Ok(committed(placed, &draft)));

        mocks
            .payments
            .expect_create_payment_session()
            .returning(|_, _, _| {
                Err(PaymentGatewayError::UnexpectedResponse(
                    "gateway unavailable".to_string(),
                ))
            });

        let result = mocks
            .service()
            .place_order(request(CheckoutChannel::Storefront, 1), PaymentMethod::Online)
            .await;

        assert!(
            matches!(result, Err(CheckoutServiceError::Payment { order, .. }) if order == placed),
            "expected Payment error, got {result:?}"
        );
    }

    #[tokio::test]
    async fn validate_coupon_returns_rejection_reason() {
        let mut mocks = Mocks::stocked(5, 5);

        mocks.coupons.expect_find_coupon().returning(|_| Ok(None));

        let lines = request(CheckoutChannel::Storefront, 1).lines;
        let result = mocks
            .service()
            .validate_coupon(lines, "nope".to_string())
            .await;

        assert!(
            matches!(
                result,
                Err(CheckoutServiceError::Coupon(CouponRejection::InvalidCode))
            ),
            "expected InvalidCode, got {result:?}"
        );
    }

    #[tokio::test]
    async fn validate_coupon_reports_discount() -> TestResult {
        let mut mocks = Mocks::stocked(5, 5);

        mocks
            .coupons
            .expect_find_coupon()
            .returning(|_| Ok(Some(coupon("SAVE50", Timestamp::now() + 1.hour()))));

        let lines = request(CheckoutChannel::Storefront, 2).lines;
        let applied = mocks
            .service()
            .validate_coupon(lines, "save50".to_string())
            .await?;

        assert_eq!(applied.code, "SAVE50");
        assert_eq!(applied.eligible_subtotal, 100_000);
        assert_eq!(applied.discount, 5_000);

        Ok(())
    }

    #[tokio::test]
    async fn resolve_outlet_without_candidates_fails() {
        let lines = request(CheckoutChannel::Storefront, 9).lines;
        let result = Mocks::stocked(5, 5)
            .service()
            .resolve_outlet(lines, Some(GeoPoint::new(NEAR_GULSHAN.0, NEAR_GULSHAN.1)))
            .await;

        assert!(
            matches!(
                result,
                Err(CheckoutServiceError::Fulfillment(FulfillmentError::NoFulfillingOutlet))
            ),
            "expected NoFulfillingOutlet, got {result:?}"
        );
    }

    #[tokio::test]
    async fn placed_order_decrements_stock_at_the_nearest_outlet() -> TestResult {
        let ctx = TestContext::new().await;

        let (product, variant) = create_product(&ctx, "Shirt", "SHIRT-M", 50_000).await?;
        let near = create_outlet(&ctx, "Gulshan", GULSHAN, "Dhaka", true, 1).await?;
        let far = create_outlet(&ctx, "Dhanmondi", DHANMONDI, "Dhaka", true, 0).await?;
        let customer = create_customer(&ctx, "Nadia", 0, 0).await?;

        add_address(&ctx, customer, "Road 11", "Dhaka", Some(NEAR_GULSHAN)).await?;
        set_outlet_stock(&ctx, near, variant, 4).await?;
        set_outlet_stock(&ctx, far, variant, 4).await?;

        let mut payments = MockPaymentGateway::new();
        payments.expect_create_payment_session().never();

        let request = CheckoutRequest {
            customer,
            lines: vec![CheckoutLine {
                product,
                sku: "SHIRT-M".to_string(),
                quantity: 2,
            }],
            ..request(CheckoutChannel::Storefront, 0)
        };

        let placed = ctx
            .checkout(payments)
            .place_order(request, PaymentMethod::CashOnDelivery)
            .await?;

        assert_eq!(placed.order.assigned_outlet_uuid, Some(near));
        assert_eq!(placed.order.shipping_fee, 4_000);
        assert_eq!(placed.order.total_amount, 104_000);
        assert_eq!(placed.order.items.len(), 1);
        assert_eq!(outlet_stock(&ctx, near, variant).await?, 2);
        assert_eq!(outlet_stock(&ctx, far, variant).await?, 4);

        let stored = ctx.orders.get_order(placed.uuid()).await?;

        assert_eq!(stored, placed.order);

        Ok(())
    }
}
