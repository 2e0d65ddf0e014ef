//! Test Helpers
//!
//! Seed rows directly; the services under test only read them.

use jiff::Timestamp;
use jiff_sqlx::Timestamp as SqlxTimestamp;
use rusty_money::{Money, iso::BDT};
use sqlx::{query, query_scalar};
use storefront::{
    cart::{Cart, CartLine},
    channels::CheckoutChannel,
    orders::{OrderDraft, PaymentMethod},
    pricing::{DiscountContext, compute_totals},
    products::{ProductId, Sku},
};

use crate::{
    domain::{
        catalog::records::{DepositRecord, ProductUuid, VariantUuid},
        coupons::records::{CouponUuid, CouponValue},
        customers::records::{AddressUuid, CustomerUuid},
        gift_cards::records::GiftCardUuid,
        outlets::records::OutletUuid,
    },
    test::TestContext,
};

type HelperResult<T> = Result<T, Box<dyn std::error::Error>>;

pub(crate) async fn create_product(
    ctx: &TestContext,
    name: &str,
    sku: &str,
    price: i64,
) -> HelperResult<(ProductUuid, VariantUuid)> {
    let product = ProductUuid::new();

    query("INSERT INTO products (uuid, name) VALUES ($1, $2)")
        .bind(product.into_uuid())
        .bind(name)
        .execute(ctx.db.pool())
        .await?;

    let variant = create_variant(ctx, product, sku, price).await?;

    Ok((product, variant))
}

pub(crate) async fn create_pre_order_product(
    ctx: &TestContext,
    name: &str,
    sku: &str,
    price: i64,
    deposit: DepositRecord,
) -> HelperResult<(ProductUuid, VariantUuid)> {
    let product = ProductUuid::new();

    let (deposit_type, deposit_amount) = match deposit {
        DepositRecord::Percentage { basis_points } => ("percentage", i64::from(basis_points)),
        DepositRecord::PerUnit { amount } => ("per_unit", amount),
    };

    query(
        "INSERT INTO products (uuid, name, is_pre_order, deposit_type, deposit_amount) \
         VALUES ($1, $2, TRUE, $3, $4)",
    )
    .bind(product.into_uuid())
    .bind(name)
    .bind(deposit_type)
    .bind(deposit_amount)
    .execute(ctx.db.pool())
    .await?;

    let variant = create_variant(ctx, product, sku, price).await?;

    Ok((product, variant))
}

async fn create_variant(
    ctx: &TestContext,
    product: ProductUuid,
    sku: &str,
    price: i64,
) -> HelperResult<VariantUuid> {
    let variant = VariantUuid::new();

    query("INSERT INTO product_variants (uuid, product_uuid, sku, price) VALUES ($1, $2, $3, $4)")
        .bind(variant.into_uuid())
        .bind(product.into_uuid())
        .bind(sku)
        .bind(price)
        .execute(ctx.db.pool())
        .await?;

    Ok(variant)
}

pub(crate) async fn create_outlet(
    ctx: &TestContext,
    name: &str,
    (latitude, longitude): (f64, f64),
    district: &str,
    active: bool,
    position: i32,
) -> HelperResult<OutletUuid> {
    let outlet = OutletUuid::new();

    query(
        "INSERT INTO outlets (uuid, name, status, latitude, longitude, district, position) \
         VALUES ($1, $2, $3, $4, $5, $6, $7)",
    )
    .bind(outlet.into_uuid())
    .bind(name)
    .bind(if active { "active" } else { "inactive" })
    .bind(latitude)
    .bind(longitude)
    .bind(district)
    .bind(position)
    .execute(ctx.db.pool())
    .await?;

    Ok(outlet)
}

/// Set the units on hand at `outlet` and recompute the variant's global stock.
pub(crate) async fn set_outlet_stock(
    ctx: &TestContext,
    outlet: OutletUuid,
    variant: VariantUuid,
    quantity: i64,
) -> HelperResult<()> {
    query(
        "INSERT INTO outlet_stocks (outlet_uuid, variant_uuid, quantity) VALUES ($1, $2, $3) \
         ON CONFLICT (outlet_uuid, variant_uuid) DO UPDATE SET quantity = EXCLUDED.quantity",
    )
    .bind(outlet.into_uuid())
    .bind(variant.into_uuid())
    .bind(quantity)
    .execute(ctx.db.pool())
    .await?;

    query(
        "UPDATE product_variants SET stock = \
         (SELECT COALESCE(SUM(quantity), 0) FROM outlet_stocks WHERE variant_uuid = $1) \
         WHERE uuid = $1",
    )
    .bind(variant.into_uuid())
    .execute(ctx.db.pool())
    .await?;

    Ok(())
}

pub(crate) async fn create_customer(
    ctx: &TestContext,
    name: &str,
    loyalty_points: i64,
    card_promo_bps: i32,
) -> HelperResult<CustomerUuid> {
    let customer = CustomerUuid::new();

    query(
        "INSERT INTO customers (uuid, name, loyalty_points, card_promo_bps) \
         VALUES ($1, $2, $3, $4)",
    )
    .bind(customer.into_uuid())
    .bind(name)
    .bind(loyalty_points)
    .bind(card_promo_bps)
    .execute(ctx.db.pool())
    .await?;

    Ok(customer)
}

pub(crate) async fn add_address(
    ctx: &TestContext,
    customer: CustomerUuid,
    line: &str,
    district: &str,
    location: Option<(f64, f64)>,
) -> HelperResult<AddressUuid> {
    let address = AddressUuid::new();

    query(
        "INSERT INTO customer_addresses (uuid, customer_uuid, line, district, latitude, longitude) \
         VALUES ($1, $2, $3, $4, $5, $6)",
    )
    .bind(address.into_uuid())
    .bind(customer.into_uuid())
    .bind(line)
    .bind(district)
    .bind(location.map(|(lat, _)| lat))
    .bind(location.map(|(_, lng)| lng))
    .execute(ctx.db.pool())
    .await?;

    Ok(address)
}

pub(crate) async fn create_coupon(
    ctx: &TestContext,
    code: &str,
    value: CouponValue,
    minimum_spend: i64,
    expires_at: Timestamp,
    (usage_limit, used_count): (i32, i32),
    products: &[ProductUuid],
) -> HelperResult<CouponUuid> {
    let coupon = CouponUuid::new();

    let (discount_type, amount) = match value {
        CouponValue::Fixed { amount } => ("fixed", amount),
        CouponValue::Percentage { basis_points } => ("percentage", i64::from(basis_points)),
    };

    query(
        "INSERT INTO coupons \
         (uuid, code, discount_type, value, minimum_spend, expires_at, usage_limit, used_count) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
    )
    .bind(coupon.into_uuid())
    .bind(code)
    .bind(discount_type)
    .bind(amount)
    .bind(minimum_spend)
    .bind(SqlxTimestamp::from(expires_at))
    .bind(usage_limit)
    .bind(used_count)
    .execute(ctx.db.pool())
    .await?;

    for product in products {
        query("INSERT INTO coupon_products (coupon_uuid, product_uuid) VALUES ($1, $2)")
            .bind(coupon.into_uuid())
            .bind(product.into_uuid())
            .execute(ctx.db.pool())
            .await?;
    }

    Ok(coupon)
}

pub(crate) async fn create_gift_card(
    ctx: &TestContext,
    code: &str,
    balance: i64,
    expires_at: Option<Timestamp>,
) -> HelperResult<GiftCardUuid> {
    let card = GiftCardUuid::new();

    query("INSERT INTO gift_cards (uuid, code, balance, expires_at) VALUES ($1, $2, $3, $4)")
        .bind(card.into_uuid())
        .bind(code)
        .bind(balance)
        .bind(expires_at.map(SqlxTimestamp::from))
        .execute(ctx.db.pool())
        .await?;

    Ok(card)
}

pub(crate) async fn outlet_stock(
    ctx: &TestContext,
    outlet: OutletUuid,
    variant: VariantUuid,
) -> HelperResult<i64> {
    Ok(query_scalar(
        "SELECT quantity FROM outlet_stocks WHERE outlet_uuid = $1 AND variant_uuid = $2",
    )
    .bind(outlet.into_uuid())
    .bind(variant.into_uuid())
    .fetch_one(ctx.db.pool())
    .await?)
}

pub(crate) async fn variant_stock(ctx: &TestContext, variant: VariantUuid) -> HelperResult<i64> {
    Ok(query_scalar("SELECT stock FROM product_variants WHERE uuid = $1")
        .bind(variant.into_uuid())
        .fetch_one(ctx.db.pool())
        .await?)
}

pub(crate) async fn loyalty_points(ctx: &TestContext, customer: CustomerUuid) -> HelperResult<i64> {
    Ok(query_scalar("SELECT loyalty_points FROM customers WHERE uuid = $1")
        .bind(customer.into_uuid())
        .fetch_one(ctx.db.pool())
        .await?)
}

pub(crate) async fn ledger_changes(
    ctx: &TestContext,
    customer: CustomerUuid,
) -> HelperResult<Vec<i64>> {
    Ok(query_scalar(
        "SELECT points_change FROM loyalty_ledger WHERE customer_uuid = $1 ORDER BY created_at",
    )
    .bind(customer.into_uuid())
    .fetch_all(ctx.db.pool())
    .await?)
}

pub(crate) async fn coupon_used_count(ctx: &TestContext, code: &str) -> HelperResult<i32> {
    Ok(query_scalar("SELECT used_count FROM coupons WHERE code = $1")
        .bind(code)
        .fetch_one(ctx.db.pool())
        .await?)
}

pub(crate) async fn gift_card_balance(ctx: &TestContext, code: &str) -> HelperResult<i64> {
    Ok(query_scalar("SELECT balance FROM gift_cards WHERE code = $1")
        .bind(code)
        .fetch_one(ctx.db.pool())
        .await?)
}

pub(crate) async fn order_count(ctx: &TestContext) -> HelperResult<i64> {
    Ok(query_scalar("SELECT COUNT(*) FROM orders")
        .fetch_one(ctx.db.pool())
        .await?)
}

/// A regular BDT cart line for a seeded product.
pub(crate) fn regular_line(
    product: ProductUuid,
    sku: &str,
    name: &str,
    quantity: u32,
    price: i64,
) -> CartLine<'static> {
    CartLine::regular(
        ProductId::from_uuid(product.into_uuid()),
        Sku::new(sku),
        name,
        quantity,
        Money::from_minor(price, BDT),
    )
}

/// Price `lines` and draft a storefront order.
pub(crate) fn draft(
    lines: Vec<CartLine<'static>>,
    context: &DiscountContext<'static>,
    customer: CustomerUuid,
    outlet: Option<OutletUuid>,
    payment_method: PaymentMethod,
) -> HelperResult<OrderDraft> {
    let cart = Cart::with_lines(lines, BDT)?;
    let breakdown = compute_totals(&cart, context)?;

    Ok(OrderDraft::prepare(
        &cart,
        breakdown,
        storefront::customers::CustomerId::from_uuid(customer.into_uuid()),
        outlet.map(|outlet| storefront::outlets::OutletId::from_uuid(outlet.into_uuid())),
        payment_method,
        CheckoutChannel::Storefront,
    )?)
}
