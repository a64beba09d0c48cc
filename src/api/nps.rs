//! Parks directory API response structures and conversion

use serde::Deserialize;

use crate::error::ParkcastError;
use crate::models::{Coordinates, ParkInfo};

#[derive(Debug, Deserialize)]
pub struct ParksResponse {
    pub data: Vec<NpsPark>,
}

/// The directory serves coordinates as decimal strings, occasionally blank.
#[derive(Debug, Deserialize, Clone)]
#[serde(untagged)]
pub enum Degrees {
    Number(f64),
    Text(String),
}

impl Degrees {
    fn value(&self) -> Result<Option<f64>, ParkcastError> {
        match self {
            Degrees::Number(n) => Ok(Some(*n)),
            Degrees::Text(s) if s.trim().is_empty() => Ok(None),
            Degrees::Text(s) => s
                .trim()
                .parse::<f64>()
                .map(Some)
                .map_err(|_| ParkcastError::parse(format!("Invalid coordinate '{s}'"))),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NpsPark {
    pub full_name: String,
    pub park_code: String,
    #[serde(default)]
    pub description: String,
    pub latitude: Degrees,
    pub longitude: Degrees,
    #[serde(default)]
    pub activities: Vec<Named>,
    #[serde(default)]
    pub topics: Vec<Named>,
    #[serde(default)]
    pub states: String,
    #[serde(default)]
    pub directions_url: String,
    #[serde(default)]
    pub designation: String,
}

#[derive(Debug, Deserialize)]
pub struct Named {
    pub name: String,
}

impl NpsPark {
    /// Park coordinates, `None` when the directory lists none.
    pub fn coordinates(&self) -> Result<Option<Coordinates>, ParkcastError> {
        match (self.latitude.value()?, self.longitude.value()?) {
            (Some(latitude), Some(longitude)) => Ok(Some(Coordinates::new(latitude, longitude))),
            _ => Ok(None),
        }
    }

    pub fn into_info(self, coords: Coordinates) -> ParkInfo {
        ParkInfo {
            name: self.full_name,
            park_code: self.park_code,
            description: self.description,
            coords,
            activities: self.activities.into_iter().map(|a| a.name).collect(),
            topics: self.topics.into_iter().map(|t| t.name).collect(),
            states: self
                .states
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
            url: self.directions_url,
            designation: self.designation,
        }
    }
}
