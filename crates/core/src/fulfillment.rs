//! Outlet fulfillment
//!
//! Picks the single outlet that can ship every regular line of a cart. Orders
//! are never split across outlets.

use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use thiserror::Error;

use crate::{
    cart::{Cart, CartLine},
    outlets::{GeoPoint, Outlet, OutletId},
    products::{ProductId, Sku},
};

/// Radius within which the nearest outlet qualifies for express delivery, in kilometres.
pub const EXPRESS_RADIUS_KM: f64 = 5.0;

/// Errors raised while choosing or checking a fulfillment outlet.
#[derive(Debug, Error, PartialEq)]
pub enum FulfillmentError {
    /// No single active outlet holds stock for every regular line.
    #[error("no outlet can fulfill every item in the cart")]
    NoFulfillingOutlet,

    /// The requested outlet is unknown.
    #[error("outlet {0} not found")]
    OutletNotFound(OutletId),

    /// The requested outlet is not taking orders.
    #[error("outlet {0} is inactive")]
    OutletInactive(OutletId),

    /// The requested outlet lacks stock for some lines.
    #[error("outlet {outlet} cannot fulfill {} item(s)", shortfalls.len())]
    InsufficientStock {
        /// Outlet that was checked
        outlet: OutletId,
        /// Lines it cannot cover
        shortfalls: Vec<StockShortfall>,
    },
}

/// A regular line an outlet cannot cover.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StockShortfall {
    /// Variant SKU
    pub sku: Sku,

    /// Product name
    pub name: String,

    /// Quantity in the cart
    pub requested: u32,

    /// Quantity on hand at the outlet
    pub available: i64,
}

/// Stock snapshot for one variant.
#[derive(Debug, Clone, Default)]
pub struct VariantStock {
    /// Global stock counter
    pub stock: i64,

    /// Units on hand per outlet
    pub outlet_stocks: FxHashMap<OutletId, i64>,
}

impl VariantStock {
    /// Units on hand at `outlet`; zero when the outlet carries none.
    pub fn at(&self, outlet: OutletId) -> i64 {
        self.outlet_stocks.get(&outlet).copied().unwrap_or_default()
    }
}

/// Stock snapshot for the variants in a cart, keyed by product and SKU.
#[derive(Debug, Clone, Default)]
pub struct Inventory {
    variants: FxHashMap<(ProductId, Sku), VariantStock>,
}

impl Inventory {
    /// Record the stock of one variant.
    pub fn insert(&mut self, product: ProductId, sku: Sku, stock: VariantStock) {
        self.variants.insert((product, sku), stock);
    }

    /// Stock of a variant, if known.
    pub fn variant(&self, product: ProductId, sku: &Sku) -> Option<&VariantStock> {
        self.variants.get(&(product, sku.clone()))
    }

    /// Units of the line's variant on hand at `outlet`.
    pub fn available(&self, line: &CartLine<'_>, outlet: OutletId) -> i64 {
        self.variant(line.product(), line.sku())
            .map(|variant| variant.at(outlet))
            .unwrap_or_default()
    }

    /// Regular lines `outlet` cannot cover.
    pub fn shortfalls(&self, cart: &Cart<'_>, outlet: OutletId) -> Vec<StockShortfall> {
        cart.regular_lines()
            .filter_map(|line| {
                let available = self.available(line, outlet);

                (available < i64::from(line.quantity())).then(|| StockShortfall {
                    sku: line.sku().clone(),
                    name: line.name().to_string(),
                    requested: line.quantity(),
                    available,
                })
            })
            .collect()
    }

    /// Whether `outlet` holds enough stock for every regular line.
    pub fn can_fulfill(&self, cart: &Cart<'_>, outlet: OutletId) -> bool {
        cart.regular_lines()
            .all(|line| self.available(line, outlet) >= i64::from(line.quantity()))
    }
}

/// The chosen outlet and how it was chosen.
#[derive(Debug, Clone, Copy)]
pub struct OutletSelection<'o> {
    /// The outlet
    pub outlet: &'o Outlet,

    /// Distance from the customer, when coordinates were known
    pub distance_km: Option<f64>,

    /// Whether the outlet is inside the express radius
    pub express_eligible: bool,
}

/// Choose the outlet that fulfills `cart`.
///
/// Candidates must be active and hold stock for every regular line; pre-order
/// lines are ignored. With customer coordinates the nearest candidate wins,
/// otherwise the first in `outlets` order.
pub fn resolve_outlet<'o>(
    cart: &Cart<'_>,
    outlets: &'o [Outlet],
    inventory: &Inventory,
    customer: Option<GeoPoint>,
) -> Option<OutletSelection<'o>> {
    let candidates: SmallVec<[&Outlet; 8]> = outlets
        .iter()
        .filter(|outlet| outlet.is_active() && inventory.can_fulfill(cart, outlet.id))
        .collect();

    let Some(point) = customer else {
        return candidates.first().copied().map(|outlet| OutletSelection {
            outlet,
            distance_km: None,
            express_eligible: false,
        });
    };

    candidates
        .into_iter()
        .map(|outlet| (outlet, point.distance_km(&outlet.location)))
        .min_by(|(_, a), (_, b)| a.total_cmp(b))
        .map(|(outlet, distance)| OutletSelection {
            outlet,
            distance_km: Some(distance),
            express_eligible: distance <= EXPRESS_RADIUS_KM,
        })
}

/// Check that a pinned outlet can fulfill `cart`.
///
/// # Errors
///
/// Returns a [`FulfillmentError`] if the outlet is inactive or short on stock.
pub fn check_outlet(
    cart: &Cart<'_>,
    outlet: &Outlet,
    inventory: &Inventory,
) -> Result<(), FulfillmentError> {
    if !outlet.is_active() {
        return Err(FulfillmentError::OutletInactive(outlet.id));
    }

    let shortfalls = inventory.shortfalls(cart, outlet.id);

    if shortfalls.is_empty() {
        Ok(())
    } else {
        Err(FulfillmentError::InsufficientStock {
            outlet: outlet.id,
            shortfalls,
        })
    }
}
