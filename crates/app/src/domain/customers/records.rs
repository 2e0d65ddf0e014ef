//! Customer Records

use storefront::{
    customers::{Address, CustomerId, CustomerProfile},
    discounts::percentage_from_basis_points,
    outlets::GeoPoint,
};

use crate::uuids::TypedUuid;

/// Customer UUID
pub type CustomerUuid = TypedUuid<CustomerRecord>;

/// Address UUID
pub type AddressUuid = TypedUuid<AddressRecord>;

/// Customer Record
#[derive(Debug, Clone, PartialEq)]
pub struct CustomerRecord {
    pub uuid: CustomerUuid,
    pub name: String,
    pub loyalty_points: i64,
    pub card_promo_bps: u32,
    pub membership_tier: Option<String>,
    pub addresses: Vec<AddressRecord>,
}

/// Address Record
#[derive(Debug, Clone, PartialEq)]
pub struct AddressRecord {
    pub uuid: AddressUuid,
    pub line: String,
    pub district: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl CustomerRecord {
    /// Read-only profile used when pricing a checkout.
    #[must_use]
    pub fn to_profile(&self) -> CustomerProfile {
        CustomerProfile {
            id: CustomerId::from_uuid(self.uuid.into_uuid()),
            loyalty_points: self.loyalty_points,
            card_promo: percentage_from_basis_points(self.card_promo_bps),
            membership_tier: self.membership_tier.clone(),
            addresses: self.addresses.iter().map(AddressRecord::to_address).collect(),
        }
    }
}

impl AddressRecord {
    #[must_use]
    pub fn to_address(&self) -> Address {
        Address {
            line: self.line.clone(),
            district: self.district.clone(),
            location: self
                .latitude
                .zip(self.longitude)
                .map(|(lat, lng)| GeoPoint::new(lat, lng)),
        }
    }
}

impl From<CustomerId> for CustomerUuid {
    fn from(value: CustomerId) -> Self {
        Self::from_uuid(value.into_uuid())
    }
}
