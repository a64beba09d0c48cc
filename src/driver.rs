//! Interactive driver
//!
//! Asks for an address until it geocodes to a U.S. location, then runs the
//! park search for that location's state.

use std::io::{BufRead, Write};
use std::path::Path;

use anyhow::{Context, Result};
use tokio::task;
use tracing::{debug, info};

use crate::api::ParksApiClient;
use crate::cache::ResponseCache;
use crate::error::ParkcastError;
use crate::models::{Location, check_location};
use crate::recommend::{Recommendation, ScoreWindow, filter_by_activity, recommend};

pub const PROMPT: &str = "Please enter a location in the US to search around: ";
pub const RETRY_MESSAGE: &str = "No valid location found! Trying again...";

/// Resolves free-text addresses to locations
#[allow(async_fn_in_trait)]
pub trait Geocoder {
    /// `Ok(None)` means the address could not be resolved.
    async fn geocode(&self, address: &str) -> Result<Option<Location>>;
}

impl Geocoder for ParksApiClient {
    async fn geocode(&self, address: &str) -> Result<Option<Location>> {
        self.fetch_location(address).await
    }
}

/// States of the address prompt
#[derive(Debug, Clone, PartialEq)]
pub enum PromptState {
    AwaitingInput,
    Validating(String),
    Accepted(Location),
}

/// Prompt loop over any line source and sink
pub struct LocationPrompt<R, W> {
    input: R,
    output: W,
    max_attempts: Option<u32>,
}

impl<R: BufRead, W: Write> LocationPrompt<R, W> {
    pub fn new(input: R, output: W, max_attempts: Option<u32>) -> Self {
        Self {
            input,
            output,
            max_attempts,
        }
    }

    /// Prompt until an address resolves to a supported location.
    ///
    /// Rejected addresses send the prompt back to `AwaitingInput`. Running out
    /// of input, or of attempts when `max_attempts` is set, is an error.
    pub async fn run<G: Geocoder>(&mut self, geocoder: &G) -> Result<Location> {
        let mut state = PromptState::AwaitingInput;
        let mut rejected: u32 = 0;

        loop {
            state = match state {
                PromptState::AwaitingInput => {
                    if let Some(max) = self.max_attempts {
                        if rejected >= max {
                            return Err(ParkcastError::validation(format!(
                                "No valid location after {rejected} attempts"
                            ))
                            .into());
                        }
                    }
                    PromptState::Validating(self.read_address()?)
                }
                PromptState::Validating(address) => {
                    match resolve(geocoder, &address).await? {
                        Some(location) => {
                            writeln!(self.output, "Searching for parks nearby {}...", location.name)?;
                            PromptState::Accepted(location)
                        }
                        None => {
                            rejected += 1;
                            debug!("Rejected address '{}' ({} so far)", address, rejected);
                            writeln!(self.output, "{RETRY_MESSAGE}")?;
                            PromptState::AwaitingInput
                        }
                    }
                }
                PromptState::Accepted(location) => return Ok(location),
            };
        }
    }

    fn read_address(&mut self) -> Result<String> {
        write!(self.output, "{PROMPT}")?;
        self.output.flush()?;

        let mut line = String::new();
        let read = self
            .input
            .read_line(&mut line)
            .with_context(|| "Failed to read address")?;
        if read == 0 {
            return Err(ParkcastError::validation("Input closed before a valid location was entered").into());
        }
        Ok(line.trim().to_string())
    }
}

/// Geocode `address` and apply the validation gate.
///
/// Besides being in the U.S., a location must carry a state code: parks are
/// searched per state, and a country-wide result has nothing to narrow by.
async fn resolve<G: Geocoder>(geocoder: &G, address: &str) -> Result<Option<Location>> {
    if address.is_empty() {
        return Ok(None);
    }
    let location = geocoder.geocode(address).await?;
    Ok(location.filter(is_searchable))
}

fn is_searchable(location: &Location) -> bool {
    if !check_location(Some(location)) {
        return false;
    }
    if location.state.is_none() {
        debug!("'{}' resolved without a state code", location.name);
        return false;
    }
    true
}

/// Resolve a single address given up front, without prompting.
pub async fn resolve_address<G: Geocoder>(geocoder: &G, address: &str) -> Result<Location> {
    resolve(geocoder, address.trim()).await?.ok_or_else(|| {
        ParkcastError::validation(format!("'{address}' is not a location in a US state")).into()
    })
}

/// Fetch, score and rank the parks in `location`'s state.
///
/// The response cache is loaded from `cache_path` and written back after the
/// parks fetch succeeds. Both file operations run on the blocking pool.
pub async fn find_recommendation(
    client: &ParksApiClient,
    location: &Location,
    cache_path: &Path,
    window: ScoreWindow,
    activity: Option<&str>,
) -> Result<Option<Recommendation>> {
    let path = cache_path.to_path_buf();
    let mut cache = task::spawn_blocking(move || ResponseCache::open(path))
        .await
        .with_context(|| "Cache loading task failed")?;

    let parks = client
        .fetch_parks_by_state(location.state.as_deref(), &mut cache, window)
        .await?;

    task::spawn_blocking(move || cache.save())
        .await
        .with_context(|| "Cache saving task failed")?
        .with_context(|| format!("Failed to save cache to {}", cache_path.display()))?;

    let parks = match activity {
        Some(keyword) => {
            let filtered = filter_by_activity(parks, keyword);
            info!("{} parks offer '{}'", filtered.len(), keyword);
            filtered
        }
        None => parks,
    };

    Ok(recommend(parks, window))
}
