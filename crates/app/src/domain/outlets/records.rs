//! Outlet Records

use storefront::outlets::{GeoPoint, Outlet, OutletId, OutletStatus};

use crate::uuids::TypedUuid;

/// Outlet UUID
pub type OutletUuid = TypedUuid<OutletRecord>;

/// Outlet Record
#[derive(Debug, Clone, PartialEq)]
pub struct OutletRecord {
    pub uuid: OutletUuid,
    pub name: String,
    pub status: OutletStatus,
    pub latitude: f64,
    pub longitude: f64,
    pub address: String,
    pub district: String,
}

impl OutletRecord {
    /// The outlet as the fulfillment resolver sees it.
    #[must_use]
    pub fn to_outlet(&self) -> Outlet {
        Outlet {
            id: OutletId::from_uuid(self.uuid.into_uuid()),
            name: self.name.clone(),
            status: self.status,
            location: GeoPoint::new(self.latitude, self.longitude),
            address: self.address.clone(),
            district: self.district.clone(),
        }
    }
}

impl From<OutletId> for OutletUuid {
    fn from(value: OutletId) -> Self {
        Self::from_uuid(value.into_uuid())
    }
}
