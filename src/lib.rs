//! `parkcast` - recommends a U.S. national park to visit near an address
//!
//! Parks in the address's state are scored by their forecast cloud cover over
//! the next few days and the clearest one is recommended.

pub mod api;
pub mod cache;
pub mod config;
pub mod driver;
pub mod error;
pub mod logging;
pub mod models;
pub mod recommend;

// Re-export core types for public API
pub use api::ParksApiClient;
pub use cache::{ResponseCache, cache_key};
pub use config::ParkcastConfig;
pub use driver::{Geocoder, LocationPrompt, PromptState};
pub use error::ParkcastError;
pub use models::{Coordinates, Location, Park, ParkInfo, WeatherPoint, check_location};
pub use recommend::{Recommendation, ScoreWindow};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, ParkcastError>;
