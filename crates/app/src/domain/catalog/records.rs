//! Catalog Records

use rustc_hash::FxHashMap;
use rusty_money::{Money, iso::Currency};
use storefront::{
    cart::CartLine,
    discounts::percentage_from_basis_points,
    fulfillment::VariantStock,
    outlets::OutletId,
    products::{DepositRule, ProductId, Sku},
};

use crate::{domain::outlets::records::OutletUuid, uuids::TypedUuid};

/// Product UUID
pub type ProductUuid = TypedUuid<ProductRecord>;

/// Variant UUID
pub type VariantUuid = TypedUuid<VariantRecord>;

/// Product Record
#[derive(Debug, Clone, Copy)]
pub struct ProductRecord;

/// Pre-order deposit as stored on the product.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DepositRecord {
    Percentage { basis_points: u32 },
    PerUnit { amount: i64 },
}

/// Variant Record
///
/// Price and pre-order terms come from the product; stock is tracked globally
/// and per outlet.
#[derive(Debug, Clone, PartialEq)]
pub struct VariantRecord {
    pub uuid: VariantUuid,
    pub product_uuid: ProductUuid,
    pub sku: String,
    pub name: String,
    pub price: i64,
    pub stock: i64,
    pub is_pre_order: bool,
    pub deposit: Option<DepositRecord>,
    pub outlet_stocks: FxHashMap<OutletUuid, i64>,
}

impl VariantRecord {
    /// Cart line for `quantity` units of this variant.
    #[must_use]
    pub fn to_line(&self, quantity: u32, currency: &'static Currency) -> CartLine<'static> {
        let product = ProductId::from_uuid(self.product_uuid.into_uuid());
        let sku = Sku::new(self.sku.clone());
        let price = Money::from_minor(self.price, currency);

        if !self.is_pre_order {
            return CartLine::regular(product, sku, self.name.clone(), quantity, price);
        }

        let deposit = self.deposit.map(|deposit| match deposit {
            DepositRecord::Percentage { basis_points } => {
                DepositRule::Percentage(percentage_from_basis_points(basis_points))
            }
            DepositRecord::PerUnit { amount } => {
                DepositRule::PerUnit(Money::from_minor(amount, currency))
            }
        });

        CartLine::pre_order(product, sku, self.name.clone(), quantity, price, deposit)
    }

    /// Stock snapshot for the fulfillment resolver.
    #[must_use]
    pub fn to_stock(&self) -> VariantStock {
        VariantStock {
            stock: self.stock,
            outlet_stocks: self
                .outlet_stocks
                .iter()
                .map(|(outlet, quantity)| (OutletId::from_uuid(outlet.into_uuid()), *quantity))
                .collect(),
        }
    }
}
