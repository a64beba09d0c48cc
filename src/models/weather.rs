//! Forecast sample model

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::location::Coordinates;
use crate::error::ParkcastError;

/// Condition label the forecast service uses for rain
pub const RAIN_CONDITION: &str = "Rain";

/// One forecast timestep for a coordinate pair
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct WeatherPoint {
    pub coords: Coordinates,
    /// Calendar date of the sample
    pub date: NaiveDate,
    /// Hour of day, 0-23
    pub hour: u32,
    /// Temperature in the configured units
    pub temp: f64,
    /// Relative humidity in percent
    pub humidity: f64,
    /// Short condition label, e.g. "Rain" or "Clear"
    pub condition: String,
    /// Cloud cover percentage (0-100)
    pub cloudiness: f64,
}

impl WeatherPoint {
    #[must_use]
    pub fn is_rain(&self) -> bool {
        self.condition == RAIN_CONDITION
    }
}

/// Parse the fixed-width `YYYY-MM-DD HH:MM:SS` timestamp layout into a date and hour.
///
/// Only the positional fields are read: year `[0..4]`, month `[5..7]`,
/// day `[8..10]` and hour `[11..13]`.
pub fn parse_timestamp(dt_txt: &str) -> Result<(NaiveDate, u32), ParkcastError> {
    let field = |range: std::ops::Range<usize>| -> Result<u32, ParkcastError> {
        dt_txt
            .get(range.clone())
            .and_then(|s| s.parse::<u32>().ok())
            .ok_or_else(|| {
                ParkcastError::parse(format!(
                    "Invalid forecast timestamp '{dt_txt}' at {range:?}"
                ))
            })
    };

    let year = field(0..4)?;
    let month = field(5..7)?;
    let day = field(8..10)?;
    let hour = field(11..13)?;

    let year = i32::try_from(year)
        .map_err(|_| ParkcastError::parse(format!("Invalid year in '{dt_txt}'")))?;
    let date = NaiveDate::from_ymd_opt(year, month, day)
        .ok_or_else(|| ParkcastError::parse(format!("Invalid calendar date in '{dt_txt}'")))?;
    if hour > 23 {
        return Err(ParkcastError::parse(format!("Invalid hour in '{dt_txt}'")));
    }

    Ok((date, hour))
}
