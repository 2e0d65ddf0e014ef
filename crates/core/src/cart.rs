//! Cart
//!
//! The cart is a value: every change goes through [`Cart::apply`], which
//! consumes the current cart and returns the next one.

use rusty_money::{Money, iso::Currency};
use thiserror::Error;

use crate::{
    channels::CheckoutChannel,
    discounts::DiscountError,
    products::{DepositRule, ProductId, Sku},
};

/// Errors related to cart transitions or totals.
#[derive(Debug, Error)]
pub enum CartError {
    /// A line's currency differs from the cart currency (sku, line currency, cart currency).
    #[error("line {0} has currency {1}, but cart has currency {2}")]
    CurrencyMismatch(Sku, &'static str, &'static str),

    /// Quantities must be positive while a line is in the cart.
    #[error("line {0} must have a positive quantity")]
    ZeroQuantity(Sku),

    /// Unit prices cannot be negative.
    #[error("line {0} has a negative unit price")]
    NegativePrice(Sku),

    /// The referenced line is not in the cart.
    #[error("line {0} not found")]
    LineNotFound(Sku),

    /// Nothing to check out.
    #[error("cart is empty")]
    Empty,

    /// Pre-order and regular lines cannot be sold together on this channel.
    #[error("pre-order and regular items cannot be mixed on the {0} channel")]
    MixedCart(CheckoutChannel),

    /// A total did not fit in minor units.
    #[error("cart amount overflowed")]
    AmountOverflow,

    /// Deposit rule could not be applied.
    #[error(transparent)]
    Deposit(#[from] DiscountError),
}

/// Whether a line ships now or is fulfilled later.
#[derive(Debug, Clone, Copy)]
pub enum LineKind<'a> {
    /// In-stock item, fulfilled from an outlet at commit time.
    Regular,

    /// Pre-order item; `deposit` decides how much is payable now.
    PreOrder {
        /// Deposit rule defined on the product, if any.
        deposit: Option<DepositRule<'a>>,
    },
}

/// A single cart line.
#[derive(Debug, Clone)]
pub struct CartLine<'a> {
    product: ProductId,
    sku: Sku,
    name: String,
    quantity: u32,
    unit_price: Money<'a, Currency>,
    kind: LineKind<'a>,
}

impl<'a> CartLine<'a> {
    /// Create a regular (in-stock) line.
    pub fn regular(
        product: ProductId,
        sku: Sku,
        name: impl Into<String>,
        quantity: u32,
        unit_price: Money<'a, Currency>,
    ) -> Self {
        Self {
            product,
            sku,
            name: name.into(),
            quantity,
            unit_price,
            kind: LineKind::Regular,
        }
    }

    /// Create a pre-order line.
    pub fn pre_order(
        product: ProductId,
        sku: Sku,
        name: impl Into<String>,
        quantity: u32,
        unit_price: Money<'a, Currency>,
        deposit: Option<DepositRule<'a>>,
    ) -> Self {
        Self {
            product,
            sku,
            name: name.into(),
            quantity,
            unit_price,
            kind: LineKind::PreOrder { deposit },
        }
    }

    /// Product the line belongs to.
    pub fn product(&self) -> ProductId {
        self.product
    }

    /// Variant SKU.
    pub fn sku(&self) -> &Sku {
        &self.sku
    }

    /// Display name, used in customer-facing messages.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Ordered quantity.
    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Price of one unit.
    pub fn unit_price(&self) -> &Money<'a, Currency> {
        &self.unit_price
    }

    /// Line kind.
    pub fn kind(&self) -> &LineKind<'a> {
        &self.kind
    }

    /// Whether the line is a pre-order.
    pub fn is_pre_order(&self) -> bool {
        matches!(self.kind, LineKind::PreOrder { .. })
    }

    fn same_variant(&self, product: ProductId, sku: &Sku) -> bool {
        self.product == product && &self.sku == sku
    }

    /// Unit price times quantity, in minor units.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::AmountOverflow`] if the total does not fit.
    pub fn total_minor(&self) -> Result<i64, CartError> {
        self.unit_price
            .to_minor_units()
            .checked_mul(i64::from(self.quantity))
            .ok_or(CartError::AmountOverflow)
    }

    /// Amount of this line payable at checkout, in minor units.
    ///
    /// Regular lines and pre-orders without a deposit rule are payable in full.
    ///
    /// # Errors
    ///
    /// Returns a [`CartError`] if the total overflows or the deposit rule fails.
    pub fn payable_now_minor(&self) -> Result<i64, CartError> {
        let total = self.total_minor()?;

        match &self.kind {
            LineKind::PreOrder {
                deposit: Some(rule),
            } => Ok(rule.payable_minor(total, self.quantity)?),
            LineKind::Regular | LineKind::PreOrder { deposit: None } => Ok(total),
        }
    }
}

/// Cart transitions.
#[derive(Debug, Clone)]
pub enum CartAction<'a> {
    /// Add a line, merging quantities with an existing line for the same variant.
    Add(CartLine<'a>),

    /// Change a line's quantity; zero removes the line.
    SetQuantity {
        /// Product of the line to change.
        product: ProductId,
        /// SKU of the line to change.
        sku: Sku,
        /// New quantity.
        quantity: u32,
    },

    /// Remove a line.
    Remove {
        /// Product of the line to remove.
        product: ProductId,
        /// SKU of the line to remove.
        sku: Sku,
    },

    /// Remove every line.
    Clear,
}

/// Cart
#[derive(Debug, Clone)]
pub struct Cart<'a> {
    lines: Vec<CartLine<'a>>,
    currency: &'static Currency,
}

impl<'a> Cart<'a> {
    /// Create an empty cart.
    #[must_use]
    pub fn new(currency: &'static Currency) -> Self {
        Self {
            lines: Vec::new(),
            currency,
        }
    }

    /// Create a cart by adding each line in order.
    ///
    /// # Errors
    ///
    /// Returns a [`CartError`] if any line is rejected by [`CartAction::Add`].
    pub fn with_lines(
        lines: impl IntoIterator<Item = CartLine<'a>>,
        currency: &'static Currency,
    ) -> Result<Self, CartError> {
        lines
            .into_iter()
            .try_fold(Self::new(currency), |cart, line| {
                cart.apply(CartAction::Add(line))
            })
    }

    /// Apply a transition and return the resulting cart.
    ///
    /// # Errors
    ///
    /// Returns a [`CartError`] when the transition would break a cart invariant.
    pub fn apply(mut self, action: CartAction<'a>) -> Result<Self, CartError> {
        match action {
            CartAction::Add(line) => {
                self.check_line(&line)?;

                if let Some(existing) = self
                    .lines
                    .iter_mut()
                    .find(|existing| existing.same_variant(line.product, &line.sku))
                {
                    existing.quantity = existing
                        .quantity
                        .checked_add(line.quantity)
                        .ok_or(CartError::AmountOverflow)?;
                } else {
                    self.lines.push(line);
                }
            }
            CartAction::SetQuantity {
                product,
                sku,
                quantity,
            } => {
                let position = self.position(product, &sku)?;

                if quantity == 0 {
                    self.lines.remove(position);
                } else if let Some(line) = self.lines.get_mut(position) {
                    line.quantity = quantity;
                }
            }
            CartAction::Remove { product, sku } => {
                let position = self.position(product, &sku)?;

                self.lines.remove(position);
            }
            CartAction::Clear => self.lines.clear(),
        }

        Ok(self)
    }

    fn check_line(&self, line: &CartLine<'a>) -> Result<(), CartError> {
        if line.quantity == 0 {
            return Err(CartError::ZeroQuantity(line.sku.clone()));
        }

        if line.unit_price.to_minor_units() < 0 {
            return Err(CartError::NegativePrice(line.sku.clone()));
        }

        let line_currency = line.unit_price.currency();

        if line_currency != self.currency {
            return Err(CartError::CurrencyMismatch(
                line.sku.clone(),
                line_currency.iso_alpha_code,
                self.currency.iso_alpha_code,
            ));
        }

        Ok(())
    }

    fn position(&self, product: ProductId, sku: &Sku) -> Result<usize, CartError> {
        self.lines
            .iter()
            .position(|line| line.same_variant(product, sku))
            .ok_or_else(|| CartError::LineNotFound(sku.clone()))
    }

    /// Lines in display order.
    pub fn lines(&self) -> &[CartLine<'a>] {
        &self.lines
    }

    /// Lines fulfilled from outlet stock at commit time.
    pub fn regular_lines(&self) -> impl Iterator<Item = &CartLine<'a>> {
        self.lines.iter().filter(|line| !line.is_pre_order())
    }

    /// Pre-order lines.
    pub fn pre_order_lines(&self) -> impl Iterator<Item = &CartLine<'a>> {
        self.lines.iter().filter(|line| line.is_pre_order())
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Whether the cart holds any regular line.
    #[must_use]
    pub fn has_regular_lines(&self) -> bool {
        self.regular_lines().next().is_some()
    }

    /// Whether the cart holds any pre-order line.
    #[must_use]
    pub fn has_pre_order_lines(&self) -> bool {
        self.pre_order_lines().next().is_some()
    }

    /// Whether pre-order and regular lines coexist.
    #[must_use]
    pub fn is_mixed(&self) -> bool {
        self.has_regular_lines() && self.has_pre_order_lines()
    }

    /// Cart currency.
    #[must_use]
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }

    /// Sum of regular line totals.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::AmountOverflow`] if the sum does not fit.
    pub fn regular_subtotal(&self) -> Result<Money<'a, Currency>, CartError> {
        Ok(self.money(sum_minor(self.regular_lines(), CartLine::total_minor)?))
    }

    /// Sum of pre-order line totals at full price.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::AmountOverflow`] if the sum does not fit.
    pub fn pre_order_subtotal(&self) -> Result<Money<'a, Currency>, CartError> {
        Ok(self.money(sum_minor(self.pre_order_lines(), CartLine::total_minor)?))
    }

    /// Sum of what pre-order lines require today.
    ///
    /// # Errors
    ///
    /// Returns a [`CartError`] if the sum overflows or a deposit rule fails.
    pub fn pre_order_deposit_payable(&self) -> Result<Money<'a, Currency>, CartError> {
        Ok(self.money(sum_minor(
            self.pre_order_lines(),
            CartLine::payable_now_minor,
        )?))
    }

    /// Regular subtotal plus the full pre-order value.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::AmountOverflow`] if the sum does not fit.
    pub fn full_order_value(&self) -> Result<Money<'a, Currency>, CartError> {
        Ok(self.money(sum_minor(self.lines.iter(), CartLine::total_minor)?))
    }

    /// Check that the cart can be priced for checkout on `channel`.
    ///
    /// # Errors
    ///
    /// - [`CartError::Empty`]: there is nothing to check out.
    /// - [`CartError::MixedCart`]: the channel does not accept mixed carts.
    pub fn ensure_checkout_ready(&self, channel: CheckoutChannel) -> Result<(), CartError> {
        if self.is_empty() {
            return Err(CartError::Empty);
        }

        if self.is_mixed() && !channel.allows_mixed_cart() {
            return Err(CartError::MixedCart(channel));
        }

        Ok(())
    }

    fn money(&self, minor: i64) -> Money<'a, Currency> {
        Money::from_minor(minor, self.currency)
    }
}

fn sum_minor<'l, 'a: 'l, I, F>(mut lines: I, amount: F) -> Result<i64, CartError>
where
    I: Iterator<Item = &'l CartLine<'a>>,
    F: Fn(&CartLine<'a>) -> Result<i64, CartError>,
{
    lines.try_fold(0_i64, |acc, line| {
        acc.checked_add(amount(line)?)
            .ok_or(CartError::AmountOverflow)
    })
}
