//! Orders
//!
//! An [`OrderDraft`] is everything the commit transaction writes: the priced
//! lines, the discount breakdown and the initial statuses.

use std::fmt::{Display, Formatter, Result as FmtResult};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    cart::{Cart, CartError},
    channels::CheckoutChannel,
    customers::CustomerId,
    outlets::OutletId,
    pricing::PricingBreakdown,
    products::{ProductId, Sku},
};

/// Preconditions checked before an order may be committed.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// The cart is not ready for checkout.
    #[error(transparent)]
    Cart(#[from] CartError),

    /// Regular lines need an outlet to ship from.
    #[error("an outlet is required to fulfill regular items")]
    OutletRequired,

    /// The channel does not accept this payment method.
    #[error("payment method {method} is not available on the {channel} channel")]
    PaymentMethodNotAllowed {
        /// Requested payment method
        method: PaymentMethod,
        /// Channel the order came from
        channel: CheckoutChannel,
    },

    /// The summary channel only quotes.
    #[error("the summary channel cannot place orders")]
    SummaryCannotCommit,
}

macro_rules! wire_enum {
    ($(#[$meta:meta])* $name:ident { $($(#[$vmeta:meta])* $variant:ident => $wire:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(
                $(#[$vmeta])*
                #[serde(rename = $wire)]
                $variant,
            )+
        }

        impl $name {
            /// Stored and serialized name.
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $wire,)+
                }
            }

            /// Parse a stored name.
            pub fn parse(value: &str) -> Option<Self> {
                match value {
                    $($wire => Some(Self::$variant),)+
                    _ => None,
                }
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
                f.write_str(self.as_str())
            }
        }
    };
}

wire_enum! {
    /// Whether the order contains pre-order items.
    OrderType {
        /// Only in-stock items
        Regular => "regular",
        /// At least one pre-order item
        PreOrder => "pre-order",
    }
}

wire_enum! {
    /// Fulfillment status
    OrderStatus {
        /// Waiting for an online payment
        PendingPayment => "pending_payment",
        /// Accepted, not yet processed
        New => "new",
        /// Being prepared
        Processing => "processing",
        /// Handed to the courier
        Shipped => "shipped",
        /// Received by the customer
        Delivered => "delivered",
        /// Cancelled
        Cancelled => "cancelled",
    }
}

wire_enum! {
    /// Payment status
    PaymentStatus {
        /// Nothing collected yet
        Unpaid => "unpaid",
        /// Deposit collected, balance outstanding
        PartiallyPaid => "partially_paid",
        /// Fully collected
        Paid => "paid",
    }
}

wire_enum! {
    /// How the customer pays.
    PaymentMethod {
        /// Paid to the courier
        CashOnDelivery => "cod",
        /// Hosted payment gateway
        Online => "online",
        /// Cash at the outlet counter
        Cash => "cash",
    }
}

impl PaymentMethod {
    /// Whether `channel` accepts this payment method.
    pub const fn allowed_on(self, channel: CheckoutChannel) -> bool {
        match channel {
            CheckoutChannel::OutletPos => matches!(self, Self::Cash | Self::Online),
            CheckoutChannel::Storefront | CheckoutChannel::SalesRep => {
                matches!(self, Self::CashOnDelivery | Self::Online)
            }
            CheckoutChannel::Summary => false,
        }
    }
}

/// A priced order line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderLine {
    /// Product
    pub product: ProductId,

    /// Variant SKU
    pub sku: Sku,

    /// Product name at the time of ordering
    pub name: String,

    /// Quantity
    pub quantity: u32,

    /// Unit price in minor units
    pub unit_price: i64,

    /// Whether the line is a pre-order
    pub pre_order: bool,

    /// Amount charged for this line today, in minor units
    pub payable_now: i64,
}

/// An order ready to be committed.
#[derive(Debug, Clone)]
pub struct OrderDraft {
    /// Channel the order came from
    pub channel: CheckoutChannel,

    /// Customer
    pub customer: CustomerId,

    /// Fulfilling outlet; `None` only for pre-order-only orders
    pub outlet: Option<OutletId>,

    /// Regular or pre-order
    pub order_type: OrderType,

    /// Initial status
    pub status: OrderStatus,

    /// Initial payment status
    pub payment_status: PaymentStatus,

    /// Payment method
    pub payment_method: PaymentMethod,

    /// Lines in cart order
    pub lines: Vec<OrderLine>,

    /// Discount breakdown including shipping
    pub breakdown: PricingBreakdown,
}

impl OrderDraft {
    /// Build the draft for `cart` priced as `breakdown`.
    ///
    /// # Errors
    ///
    /// Returns a [`CheckoutError`] when the channel cannot commit, does not take
    /// the payment method, the cart is not ready or regular lines have no outlet.
    pub fn prepare(
        cart: &Cart<'_>,
        breakdown: PricingBreakdown,
        customer: CustomerId,
        outlet: Option<OutletId>,
        payment_method: PaymentMethod,
        channel: CheckoutChannel,
    ) -> Result<Self, CheckoutError> {
        if !channel.can_commit() {
            return Err(CheckoutError::SummaryCannotCommit);
        }

        if !payment_method.allowed_on(channel) {
            return Err(CheckoutError::PaymentMethodNotAllowed {
                method: payment_method,
                channel,
            });
        }

        cart.ensure_checkout_ready(channel)?;

        if cart.has_regular_lines() && outlet.is_none() {
            return Err(CheckoutError::OutletRequired);
        }

        let order_type = if cart.has_pre_order_lines() {
            OrderType::PreOrder
        } else {
            OrderType::Regular
        };

        let balance_due = breakdown.pre_order_balance().to_minor_units() > 0;

        let (status, payment_status) = match payment_method {
            PaymentMethod::Online => (OrderStatus::PendingPayment, PaymentStatus::Unpaid),
            PaymentMethod::CashOnDelivery => (OrderStatus::New, PaymentStatus::Unpaid),
            PaymentMethod::Cash if balance_due => (OrderStatus::New, PaymentStatus::PartiallyPaid),
            PaymentMethod::Cash => (OrderStatus::New, PaymentStatus::Paid),
        };

        let lines = cart
            .lines()
            .iter()
            .map(|line| {
                Ok(OrderLine {
                    product: line.product(),
                    sku: line.sku().clone(),
                    name: line.name().to_string(),
                    quantity: line.quantity(),
                    unit_price: line.unit_price().to_minor_units(),
                    pre_order: line.is_pre_order(),
                    payable_now: line.payable_now_minor()?,
                })
            })
            .collect::<Result<Vec<_>, CartError>>()?;

        Ok(Self {
            channel,
            customer,
            outlet,
            order_type,
            status,
            payment_status,
            payment_method,
            lines,
            breakdown,
        })
    }

    /// Lines whose stock is decremented at commit.
    pub fn regular_lines(&self) -> impl Iterator<Item = &OrderLine> {
        self.lines.iter().filter(|line| !line.pre_order)
    }
}
