//! Storefront prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    cart::{Cart, CartAction, CartError, CartLine, LineKind},
    channels::CheckoutChannel,
    coupons::{
        AppliedCoupon, Coupon, CouponError, CouponKind, CouponRejection, normalize_code,
        validate_coupon,
    },
    customers::{Address, CustomerId, CustomerProfile},
    discounts::{DiscountError, percentage_from_basis_points, percentage_to_basis_points},
    fulfillment::{
        EXPRESS_RADIUS_KM, FulfillmentError, Inventory, OutletSelection, StockShortfall,
        VariantStock, check_outlet, resolve_outlet,
    },
    gift_cards::{GiftCard, GiftCardError},
    loyalty::{LedgerEntry, LedgerEntryKind, LoyaltyError, PointsRedemption, redeem_points},
    orders::{
        CheckoutError, OrderDraft, OrderLine, OrderStatus, OrderType, PaymentMethod,
        PaymentStatus,
    },
    outlets::{GeoPoint, Outlet, OutletId, OutletStatus},
    pricing::{DiscountContext, PricingBreakdown, PricingError, compute_totals},
    products::{DepositRule, ProductId, Sku},
    shipping::{ShippingQuote, ShippingRates, ShippingTier, quote_shipping},
};
