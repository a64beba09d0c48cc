//! Recommendation engine: scores parks by forecast cloud cover and picks the clearest

use std::fmt;

use chrono::{Days, Local, NaiveDate};
use serde::Serialize;

use crate::models::{Park, WeatherPoint};

/// The days a forecast is scored over: `today+1 ..= today+days`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreWindow {
    pub today: NaiveDate,
    pub days: u32,
}

impl ScoreWindow {
    #[must_use]
    pub fn new(today: NaiveDate, days: u32) -> Self {
        Self { today, days }
    }

    /// Window anchored on the local calendar date.
    #[must_use]
    pub fn starting_today(days: u32) -> Self {
        Self::new(Local::now().date_naive(), days)
    }

    /// The scored dates, tomorrow first.
    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        (1..=u64::from(self.days)).filter_map(|offset| self.today.checked_add_days(Days::new(offset)))
    }
}

/// Mean over the window's days of each day's mean cloudiness.
///
/// A day the forecast does not cover adds nothing to the sum, but the divisor
/// stays `days`, so missing days pull the score towards clear skies.
#[must_use]
pub fn average_cloudiness(weather: &[WeatherPoint], today: NaiveDate, days: u32) -> f64 {
    if days == 0 {
        return 0.0;
    }

    let window = ScoreWindow::new(today, days);
    let total: f64 = window
        .dates()
        .filter_map(|date| daily_cloudiness(weather, date))
        .sum();

    total / f64::from(days)
}

/// Mean cloudiness of the samples dated `date`, `None` when there are none.
#[must_use]
pub fn daily_cloudiness(weather: &[WeatherPoint], date: NaiveDate) -> Option<f64> {
    let (sum, count) = weather
        .iter()
        .filter(|point| point.date == date)
        .fold((0.0, 0usize), |(sum, count), point| (sum + point.cloudiness, count + 1));

    (count > 0).then(|| sum / count as f64)
}

/// Percentage of clear sky implied by a cloudiness score, `100 - round(cloudiness)`.
#[must_use]
pub fn percent_clear(cloudiness: f64) -> u8 {
    let clear = 100.0 - cloudiness.round();
    // Clamped to 0..=100, so the cast cannot truncate
    clear.clamp(0.0, 100.0) as u8
}

/// Sort parks clearest first. Equal scores keep their fetch order.
#[must_use]
pub fn rank(mut parks: Vec<Park>) -> Vec<Park> {
    parks.sort_by(|a, b| a.cloudiness.total_cmp(&b.cloudiness));
    parks
}

/// Keep only parks offering an activity matching `keyword`.
#[must_use]
pub fn filter_by_activity(parks: Vec<Park>, keyword: &str) -> Vec<Park> {
    parks
        .into_iter()
        .filter(|park| park.offers_activity(keyword))
        .collect()
}

/// The clearest park, or `None` when there is nothing to recommend.
#[must_use]
pub fn recommend(parks: Vec<Park>, window: ScoreWindow) -> Option<Recommendation> {
    rank(parks)
        .into_iter()
        .next()
        .map(|park| Recommendation::new(park, window))
}

/// The chosen park and the figures reported for it
#[derive(Debug, Clone, Serialize)]
pub struct Recommendation {
    pub park: Park,
    pub percent_clear: u8,
    pub rainy_days: usize,
    pub days: u32,
}

impl Recommendation {
    #[must_use]
    pub fn new(park: Park, window: ScoreWindow) -> Self {
        let percent_clear = percent_clear(park.cloudiness);
        let rainy_days = park.rainy_days(window.today, window.days);
        Self {
            park,
            percent_clear,
            rainy_days,
            days: window.days,
        }
    }
}

fn number_word(n: u32) -> String {
    match n {
        1 => "one".to_string(),
        2 => "two".to_string(),
        3 => "three".to_string(),
        4 => "four".to_string(),
        5 => "five".to_string(),
        n => n.to_string(),
    }
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let span = if self.days == 1 {
            "tomorrow".to_string()
        } else {
            format!("over the next {} days", number_word(self.days))
        };

        writeln!(f, "I recommend you go visit {}!", self.park.info.name)?;
        writeln!(f, "It will be {}% clear skies {}.", self.percent_clear, span)?;
        write!(
            f,
            "This {} offers the following activities: {}",
            self.park.info.designation,
            self.park.info.activities.join(", ")
        )?;
        if self.rainy_days > 0 {
            write!(
                f,
                "\nRain is forecast on {} of the next {} days.",
                self.rainy_days,
                number_word(self.days)
            )?;
        }
        Ok(())
    }
}
