//! Coastal location registry
//!
//! The set of forecastable locations is fixed at compile time; requests name a
//! location by its display name.

use serde::ser::{Serialize, SerializeMap, Serializer};

/// A named coastal location
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Location {
    /// Display name, also the lookup key
    pub name: &'static str,
    /// Latitude in decimal degrees
    pub latitude: f64,
    /// Longitude in decimal degrees
    pub longitude: f64,
}

impl Location {
    /// Create a new location
    #[must_use]
    pub const fn new(name: &'static str, latitude: f64, longitude: f64) -> Self {
        Self {
            name,
            latitude,
            longitude,
        }
    }

    /// Longitude shifted into `[0, 360)`, the convention of the model grid
    #[must_use]
    pub fn grid_longitude(&self) -> f64 {
        self.longitude.rem_euclid(360.0)
    }
}

const COASTAL_LOCATIONS: [Location; 10] = [
    Location::new("Maldives", 4.1755, 73.5093),
    Location::new("Phu Quoc, Vietnam", 10.227, 103.963),
    Location::new("Con Dao, Vietnam", 8.6833, 106.5833),
    Location::new("Andaman Islands", 12.000, 92.900),
    Location::new("Nicobar Islands", 7.000, 93.700),
    Location::new("Lakshadweep", 10.5667, 72.6167),
    Location::new("Palawan, Philippines", 9.8349, 118.7384),
    Location::new("Koh Phi Phi, Thailand", 7.7407, 98.7784),
    Location::new("Seychelles", -4.6796, 55.4919),
    Location::new("Zanzibar, Tanzania", -6.1659, 39.2026),
];

/// Read-only registry of the coastal locations
#[derive(Debug, Clone, Copy)]
pub struct LocationRegistry {
    locations: &'static [Location],
}

impl Default for LocationRegistry {
    fn default() -> Self {
        Self::coastal()
    }
}

impl LocationRegistry {
    /// The built-in coastal registry
    #[must_use]
    pub const fn coastal() -> Self {
        Self {
            locations: &COASTAL_LOCATIONS,
        }
    }

    /// Look up a location by exact name
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&'static Location> {
        self.locations.iter().find(|location| location.name == name)
    }

    /// Iterate in registration order
    pub fn iter(&self) -> impl Iterator<Item = &'static Location> {
        self.locations.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.locations.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }
}

/// Serializes as `{name: [lat, lon]}` in registration order
impl Serialize for LocationRegistry {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.locations.len()))?;
        for location in self.locations {
            map.serialize_entry(location.name, &(location.latitude, location.longitude))?;
        }
        map.end()
    }
}
