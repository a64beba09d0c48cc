//! HTTP client for the geocoding, parks directory and forecast services
//!
//! Each fetch is a single request/decode with no retry. Only the
//! parks-by-state response is cached; geocoding and forecasts are always
//! fetched fresh.

pub mod geocoding;
pub mod nps;
pub mod openweather;

use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use futures::{StreamExt, TryStreamExt, stream};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, info, instrument, warn};

use crate::cache::{ResponseCache, cache_key};
use crate::config::ApiConfig;
use crate::error::ParkcastError;
use crate::models::{Coordinates, Location, Park, ParkInfo, WeatherPoint};
use crate::recommend::ScoreWindow;

use geocoding::GeocodingResponse;
use nps::ParksResponse;
use openweather::ForecastResponse;

const USER_AGENT: &str = concat!("parkcast/", env!("CARGO_PKG_VERSION"));

/// Client for the three remote services
pub struct ParksApiClient {
    /// HTTP client
    client: Client,
    /// Endpoints, keys and limits
    config: ApiConfig,
}

impl ParksApiClient {
    /// Create a new client
    pub fn new(config: ApiConfig) -> Result<Self> {
        let timeout = Duration::from_secs(config.timeout_seconds.into());

        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .with_context(|| "Failed to create HTTP client")?;

        Ok(Self { client, config })
    }

    /// Geocode a free-text address.
    ///
    /// Returns `Ok(None)` when the geocoder reports anything but `OK`, so the
    /// caller can ask for another address. Transport failures are errors.
    #[instrument(skip(self))]
    pub async fn fetch_location(&self, address: &str) -> Result<Option<Location>> {
        let url = format!(
            "{}?address={}&key={}",
            self.config.geocoding_url,
            urlencoding::encode(address),
            urlencoding::encode(&self.config.geocoding_key)
        );

        let response: GeocodingResponse = self.get_json(&url, "geocoding").await?;
        let status = response.status.clone();
        let location = response.into_location();

        match &location {
            Some(location) => debug!(
                "Geocoded '{}' to {} ({}), country {:?}, state {:?}",
                address,
                location.name,
                location.coords.format(),
                location.country,
                location.state
            ),
            None => warn!("Geocoder returned status {} for '{}'", status, address),
        }

        Ok(location)
    }

    /// Fetch the parks listed for a state and score each against its forecast.
    ///
    /// The raw directory response is served from `cache` when present and
    /// stored there on a miss. Forecasts are fetched with at most
    /// `max_concurrent_forecasts` in flight and joined in directory order;
    /// the first failing forecast aborts the whole call.
    #[instrument(skip(self, cache, window))]
    pub async fn fetch_parks_by_state(
        &self,
        state: Option<&str>,
        cache: &mut ResponseCache,
        window: ScoreWindow,
    ) -> Result<Vec<Park>> {
        let key = cache_key(&self.config.parks_url, &[state.unwrap_or_default()]);

        let body = if let Some(cached) = cache.get(&key).cloned() {
            info!("Using cached park list for {:?}", state);
            cached
        } else {
            let mut url = format!(
                "{}?api_key={}",
                self.config.parks_url,
                urlencoding::encode(&self.config.parks_key)
            );
            if let Some(state) = state {
                url.push_str(&format!("&stateCode={}", urlencoding::encode(state)));
            }
            let body: Value = self.get_json(&url, "parks").await?;
            cache.insert(key, body.clone());
            body
        };

        let response: ParksResponse = serde_json::from_value(body)
            .map_err(ParkcastError::from)
            .with_context(|| "Failed to parse parks response")?;

        let mut candidates: Vec<ParkInfo> = Vec::with_capacity(response.data.len());
        for record in response.data {
            match record.coordinates()? {
                Some(coords) => candidates.push(record.into_info(coords)),
                None => warn!("Skipping {} ({}): no coordinates listed", record.full_name, record.park_code),
            }
        }

        info!("Fetching forecasts for {} parks", candidates.len());
        let start_time = Instant::now();

        let concurrency = self.config.max_concurrent_forecasts.max(1);
        let parks: Vec<Park> = stream::iter(candidates)
            .map(|info| async move {
                let weather = self
                    .fetch_forecast(info.coords)
                    .await
                    .with_context(|| format!("Failed to fetch forecast for {}", info.name))?;
                Ok::<Park, anyhow::Error>(Park::with_forecast(info, weather, window.today, window.days))
            })
            .buffered(concurrency)
            .try_collect()
            .await?;

        info!(
            "Scored {} parks in {:.3}s",
            parks.len(),
            start_time.elapsed().as_secs_f64()
        );

        Ok(parks)
    }

    /// Fetch the 3-hourly forecast for a coordinate pair.
    #[instrument(skip(self, coords), fields(coords = %coords.format()))]
    pub async fn fetch_forecast(&self, coords: Coordinates) -> Result<Vec<WeatherPoint>> {
        let url = format!(
            "{}?lat={}&lon={}&appid={}&units={}",
            self.config.forecast_url,
            coords.latitude,
            coords.longitude,
            urlencoding::encode(&self.config.weather_key),
            urlencoding::encode(&self.config.units)
        );

        let response: ForecastResponse = self.get_json(&url, "forecast").await?;
        let points = response
            .into_points(coords)
            .with_context(|| "Invalid forecast sample")?;

        debug!("Received {} forecast samples", points.len());
        Ok(points)
    }

    /// GET `url` and decode the JSON body; non-2xx statuses are errors.
    async fn get_json<T: DeserializeOwned>(&self, url: &str, service: &str) -> Result<T> {
        let start_time = Instant::now();

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| ParkcastError::api(format!("{service} request failed: {e}")))?;

        let status = response.status();
        debug!(
            "{} API responded {} in {:.3}s",
            service,
            status,
            start_time.elapsed().as_secs_f64()
        );

        if !status.is_success() {
            return Err(ParkcastError::api(format!("{service} API returned {status}")).into());
        }

        let body = response
            .json::<T>()
            .await
            .map_err(|e| ParkcastError::api(format!("Invalid {service} response: {e}")))?;

        if start_time.elapsed().as_secs() > 5 {
            warn!(
                "Slow {} API response: {:.3}s",
                service,
                start_time.elapsed().as_secs_f64()
            );
        }

        Ok(body)
    }
}
