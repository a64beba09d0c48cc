//! Forecast API response structures and conversion

use serde::Deserialize;

use crate::error::ParkcastError;
use crate::models::weather::parse_timestamp;
use crate::models::{Coordinates, WeatherPoint};

#[derive(Debug, Deserialize)]
pub struct ForecastResponse {
    pub list: Vec<ForecastSample>,
}

#[derive(Debug, Deserialize)]
pub struct ForecastSample {
    /// "YYYY-MM-DD HH:MM:SS"
    pub dt_txt: String,
    pub main: MainReadings,
    pub weather: Vec<Condition>,
    pub clouds: Clouds,
}

#[derive(Debug, Deserialize)]
pub struct MainReadings {
    pub temp: f64,
    pub humidity: f64,
}

#[derive(Debug, Deserialize)]
pub struct Condition {
    pub main: String,
}

#[derive(Debug, Deserialize)]
pub struct Clouds {
    pub all: f64,
}

impl ForecastSample {
    pub fn into_point(self, coords: Coordinates) -> Result<WeatherPoint, ParkcastError> {
        let (date, hour) = parse_timestamp(&self.dt_txt)?;
        let condition = self
            .weather
            .into_iter()
            .next()
            .map(|c| c.main)
            .ok_or_else(|| {
                ParkcastError::parse(format!("Forecast sample {} has no condition", self.dt_txt))
            })?;

        Ok(WeatherPoint {
            coords,
            date,
            hour,
            temp: self.main.temp,
            humidity: self.main.humidity,
            condition,
            cloudiness: self.clouds.all,
        })
    }
}

impl ForecastResponse {
    /// One point per sample, in the order the service returned them.
    pub fn into_points(self, coords: Coordinates) -> Result<Vec<WeatherPoint>, ParkcastError> {
        self.list
            .into_iter()
            .map(|sample| sample.into_point(coords))
            .collect()
    }
}
