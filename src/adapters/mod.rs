//! Weather payload adapters
//!
//! This module provides adapters that parse raw weather-source JSON payloads and
//! map them to the source-agnostic [`RawForecast`] sample set.

mod open_meteo;

pub use open_meteo::OpenMeteoAdapter;

use crate::error::WetBulbError;
use crate::types::RawForecast;

/// Trait for weather payload adapters
pub trait WeatherPayloadAdapter {
    /// Parse raw JSON into a raw sample set
    fn parse(&self, raw_json: &str) -> Result<RawForecast, WetBulbError>;
}
