//! Catalog Data

use crate::domain::catalog::records::ProductUuid;

/// Identifies a sellable variant.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VariantKey {
    pub product: ProductUuid,
    pub sku: String,
}
