//! Geocoding API response structures and conversion

use serde::Deserialize;

use crate::models::{Coordinates, Location};

/// Status reported by the geocoder for a resolved address
pub const STATUS_OK: &str = "OK";

#[derive(Debug, Deserialize)]
pub struct GeocodingResponse {
    pub status: String,
    #[serde(default)]
    pub results: Vec<GeocodingResult>,
}

#[derive(Debug, Deserialize)]
pub struct GeocodingResult {
    pub formatted_address: String,
    pub geometry: Geometry,
    #[serde(default)]
    pub address_components: Vec<AddressComponent>,
}

#[derive(Debug, Deserialize)]
pub struct Geometry {
    pub location: LatLng,
}

#[derive(Debug, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

#[derive(Debug, Deserialize)]
pub struct AddressComponent {
    #[serde(default)]
    pub types: Vec<String>,
    pub short_name: String,
}

impl GeocodingResponse {
    /// The best match, or `None` when the geocoder could not resolve the address.
    pub fn into_location(self) -> Option<Location> {
        if self.status != STATUS_OK {
            return None;
        }
        self.results.into_iter().next().map(Location::from)
    }
}

impl From<GeocodingResult> for Location {
    fn from(result: GeocodingResult) -> Self {
        let mut country = None;
        let mut state = None;

        // Only the primary type of each component is considered
        for component in result.address_components {
            match component.types.first().map(String::as_str) {
                Some("country") => country = Some(component.short_name),
                Some("administrative_area_level_1") => state = Some(component.short_name),
                _ => {}
            }
        }

        Location::with_region(
            result.formatted_address,
            Coordinates::new(result.geometry.location.lat, result.geometry.location.lng),
            country,
            state,
        )
    }
}
