//! Data models for the parkcast application
//!
//! This module contains the core domain models organized by concern:
//! - Location: geocoded address with country and state codes
//! - Weather: individual forecast samples
//! - Park: directory entries scored by their forecast

pub mod location;
pub mod park;
pub mod weather;

// Re-export all public types for convenient access
pub use location::{Coordinates, Location, check_location};
pub use park::{Park, ParkInfo};
pub use weather::WeatherPoint;
