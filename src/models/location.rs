//! Location model for geographic coordinates and metadata

use serde::{Deserialize, Serialize};

/// Country code accepted by the park search
pub const SUPPORTED_COUNTRY: &str = "US";

/// A latitude/longitude pair in decimal degrees
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct Coordinates {
    /// Latitude in decimal degrees
    pub latitude: f64,
    /// Longitude in decimal degrees
    pub longitude: f64,
}

impl Coordinates {
    #[must_use]
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Format as a coordinates string
    #[must_use]
    pub fn format(&self) -> String {
        format!("{:.4}, {:.4}", self.latitude, self.longitude)
    }
}

/// A resolved geocoding result
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Location {
    /// Formatted address returned by the geocoder
    pub name: String,
    pub coords: Coordinates,
    /// Country code (ISO 3166-1 alpha-2)
    pub country: Option<String>,
    /// State or province code, e.g. "MI"
    pub state: Option<String>,
}

impl Location {
    /// Create location with country and state codes
    #[must_use]
    pub fn with_region(
        name: String,
        coords: Coordinates,
        country: Option<String>,
        state: Option<String>,
    ) -> Self {
        Self {
            name,
            coords,
            country,
            state,
        }
    }

    /// Whether this location lies in the country parks are searched in
    #[must_use]
    pub fn is_supported(&self) -> bool {
        self.country.as_deref() == Some(SUPPORTED_COUNTRY)
    }
}

/// Validation gate for a geocoding outcome: only a resolved U.S. location passes.
#[must_use]
pub fn check_location(location: Option<&Location>) -> bool {
    location.is_some_and(Location::is_supported)
}
