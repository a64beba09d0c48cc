//! Park model: directory entry enriched with its forecast

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::location::Coordinates;
use super::weather::WeatherPoint;
use crate::recommend::{ScoreWindow, average_cloudiness, daily_cloudiness};

/// Static park details as listed by the parks directory
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ParkInfo {
    pub name: String,
    pub park_code: String,
    pub description: String,
    pub coords: Coordinates,
    pub activities: Vec<String>,
    pub topics: Vec<String>,
    /// State codes the park lies in
    pub states: Vec<String>,
    /// Directions page
    pub url: String,
    /// e.g. "National Park", "National Lakeshore"
    pub designation: String,
}

/// A park with its forecast and derived clear-sky score
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Park {
    pub info: ParkInfo,
    pub weather: Vec<WeatherPoint>,
    /// Mean cloud cover over the scored days; lower means clearer skies
    pub cloudiness: f64,
}

impl Park {
    /// Attach a forecast to a park and score it over `today+1 ..= today+days`.
    #[must_use]
    pub fn with_forecast(
        info: ParkInfo,
        weather: Vec<WeatherPoint>,
        today: NaiveDate,
        days: u32,
    ) -> Self {
        let cloudiness = average_cloudiness(&weather, today, days);
        Self {
            info,
            weather,
            cloudiness,
        }
    }

    /// Case-insensitive substring match against the park's activities
    #[must_use]
    pub fn offers_activity(&self, keyword: &str) -> bool {
        let keyword = keyword.to_lowercase();
        self.info
            .activities
            .iter()
            .any(|activity| activity.to_lowercase().contains(&keyword))
    }

    /// Mean cloudiness of the samples on `date`, `None` if the forecast does not cover it
    #[must_use]
    pub fn average_cloudiness_on(&self, date: NaiveDate) -> Option<f64> {
        daily_cloudiness(&self.weather, date)
    }

    #[must_use]
    pub fn is_raining_on(&self, date: NaiveDate) -> bool {
        self.weather
            .iter()
            .any(|point| point.date == date && point.is_rain())
    }

    /// Number of days in `today+1 ..= today+days` with rain in the forecast
    #[must_use]
    pub fn rainy_days(&self, today: NaiveDate, days: u32) -> usize {
        ScoreWindow::new(today, days)
            .dates()
            .filter(|date| self.is_raining_on(*date))
            .count()
    }
}
