//! Outlet fixtures

use rustc_hash::FxHashMap;
use serde::Deserialize;
use uuid::Uuid;

use crate::outlets::{GeoPoint, Outlet, OutletId, OutletStatus};

/// Outlet fixture
#[derive(Debug, Deserialize)]
pub struct OutletFixture {
    /// Key
    pub key: String,

    /// Display name; defaults to the key
    pub name: Option<String>,

    /// Whether the outlet takes orders
    #[serde(default = "default_active")]
    pub active: bool,

    /// Latitude
    pub lat: f64,

    /// Longitude
    pub lng: f64,

    /// District
    pub district: String,

    /// Units on hand, keyed by line key
    #[serde(default)]
    pub stock: FxHashMap<String, i64>,
}

fn default_active() -> bool {
    true
}

impl OutletFixture {
    /// Build the outlet at position `index` of the directory.
    pub fn to_outlet(&self, index: usize) -> Outlet {
        Outlet {
            id: outlet_id(index),
            name: self.name.clone().unwrap_or_else(|| self.key.clone()),
            status: if self.active {
                OutletStatus::Active
            } else {
                OutletStatus::Inactive
            },
            location: GeoPoint::new(self.lat, self.lng),
            address: String::new(),
            district: self.district.clone(),
        }
    }
}

pub(crate) fn outlet_id(index: usize) -> OutletId {
    OutletId::from_uuid(Uuid::from_u128(0x0017_0000 + index as u128))
}
