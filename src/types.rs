//! Core types for the wet-bulb pipeline
//!
//! This module defines the data structures that flow through each stage of the
//! pipeline: raw samples from the weather source, normalized conditions and
//! forecasts, and the classified heat report handed to the display layer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::estimator::estimate_wet_bulb;
use crate::guideline::Guideline;

/// Unprocessed current-weather reading from the weather source
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RawSample {
    /// Air temperature (°C)
    pub temperature: f64,
    /// Relative humidity (%)
    pub humidity: f64,
    /// Wind speed (km/h)
    pub wind: f64,
}

/// Unprocessed hourly forecast entry. Values are optional because the weather
/// source may report gaps as nulls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawSeriesEntry {
    /// ISO-8601 timestamp string as delivered by the source, `None` if absent
    pub time: Option<String>,
    pub temperature: Option<f64>,
    pub humidity: Option<f64>,
    pub wind: Option<f64>,
}

/// Raw sample set for one query: current reading plus hourly series
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawForecast {
    /// Current reading, `None` when the source did not provide one
    pub current: Option<RawSample>,
    /// Hourly series in source order
    #[serde(default)]
    pub hourly: Vec<RawSeriesEntry>,
    /// Offset applied to series timestamps that carry no explicit zone
    #[serde(default)]
    pub utc_offset_seconds: i32,
}

/// Weather conditions at one instant, with the derived wet-bulb estimate.
///
/// Immutable once constructed. The estimate is computed eagerly so repeated
/// reads are bit-identical.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Conditions {
    temperature: f64,
    humidity: f64,
    wind: f64,
    timestamp: DateTime<Utc>,
    wet_bulb_estimate: f64,
}

impl Conditions {
    pub fn new(temperature: f64, humidity: f64, wind: f64, timestamp: DateTime<Utc>) -> Self {
        Self {
            temperature,
            humidity,
            wind,
            timestamp,
            wet_bulb_estimate: estimate_wet_bulb(temperature, humidity),
        }
    }

    /// Air temperature (°C)
    pub fn temperature(&self) -> f64 {
        self.temperature
    }

    /// Relative humidity (%)
    pub fn humidity(&self) -> f64 {
        self.humidity
    }

    /// Wind speed (km/h). Not used by the wet-bulb estimate.
    pub fn wind(&self) -> f64 {
        self.wind
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// Estimated wet-bulb temperature (°C)
    pub fn wet_bulb_estimate(&self) -> f64 {
        self.wet_bulb_estimate
    }

    /// Whole hours between `instant` and this sample (negative if in the past)
    pub fn hours_from(&self, instant: DateTime<Utc>) -> i64 {
        (self.timestamp - instant).num_hours()
    }
}

/// Current conditions plus the ordered upcoming forecast
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Forecast {
    pub current: Conditions,
    /// Ascending by timestamp, strictly after the query window, no duplicate timestamps
    pub upcoming: Vec<Conditions>,
    /// Per-entry problems encountered while building this forecast
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub diagnostics: Vec<ForecastDiagnostic>,
}

/// Kind of recoverable problem found in a series entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// Entry could not be parsed and was skipped
    MalformedEntry,
    /// Entry repeated an earlier timestamp and was dropped
    DuplicateTimestamp,
    /// Entry's wet-bulb estimate fell outside every band
    Unclassifiable,
}

/// Recoverable per-entry diagnostic
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForecastDiagnostic {
    /// Position of the entry in the raw series, or in the upcoming list for
    /// `Unclassifiable`
    pub index: usize,
    pub kind: DiagnosticKind,
    pub message: String,
}

/// Report producer metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportProducer {
    pub name: String,
    pub version: String,
    pub instance_id: String,
}

/// Band identity plus the display tokens for it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BandInfo {
    pub id: Guideline,
    pub index: usize,
    pub color: String,
    pub title: String,
    pub description: String,
    pub emoji: String,
}

impl From<Guideline> for BandInfo {
    fn from(guideline: Guideline) -> Self {
        Self {
            id: guideline,
            index: guideline.index(),
            color: guideline.color_hex(),
            title: guideline.title().to_string(),
            description: guideline.description().to_string(),
            emoji: guideline.emoji().to_string(),
        }
    }
}

/// Conditions with their guideline classification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifiedConditions {
    pub timestamp_utc: String,
    /// Whole hours after the query instant
    pub hours_ahead: i64,
    pub temperature_c: f64,
    pub humidity_pct: f64,
    pub wind_kmh: f64,
    pub wet_bulb_c: f64,
    pub band: BandInfo,
}

/// Complete heat report for display
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeatReport {
    pub report_version: String,
    pub producer: ReportProducer,
    pub generated_for_utc: String,
    pub current: ClassifiedConditions,
    pub upcoming: Vec<ClassifiedConditions>,
    /// Upcoming entry with the highest wet-bulb estimate
    pub peak: Option<ClassifiedConditions>,
    pub diagnostics: Vec<ForecastDiagnostic>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    #[test]
    fn test_wet_bulb_is_stable() {
        let now = Utc.with_ymd_and_hms(2024, 7, 1, 12, 0, 0).unwrap();
        let conditions = Conditions::new(26.0, 80.0, 5.0, now);
        let first = conditions.wet_bulb_estimate();
        let second = conditions.wet_bulb_estimate();
        assert_eq!(first.to_bits(), second.to_bits());
        assert_eq!(first.to_bits(), estimate_wet_bulb(26.0, 80.0).to_bits());
    }

    #[test]
    fn test_wind_does_not_affect_estimate() {
        let now = Utc.with_ymd_and_hms(2024, 7, 1, 12, 0, 0).unwrap();
        let calm = Conditions::new(30.0, 60.0, 0.0, now);
        let windy = Conditions::new(30.0, 60.0, 45.0, now);
        assert_eq!(calm.wet_bulb_estimate(), windy.wet_bulb_estimate());
    }

    #[test]
    fn test_hours_from() {
        let now = Utc.with_ymd_and_hms(2024, 7, 1, 12, 30, 0).unwrap();
        let later = Conditions::new(20.0, 50.0, 0.0, now + Duration::minutes(150));
        assert_eq!(later.hours_from(now), 2);
        let earlier = Conditions::new(20.0, 50.0, 0.0, now - Duration::hours(3));
        assert_eq!(earlier.hours_from(now), -3);
    }

    #[test]
    fn test_raw_forecast_defaults() {
        let raw: RawForecast = serde_json::from_str("{}").unwrap();
        assert!(raw.current.is_none());
        assert!(raw.hourly.is_empty());
        assert_eq!(raw.utc_offset_seconds, 0);
    }

    #[test]
    fn test_band_info_from_guideline() {
        let info = BandInfo::from(Guideline::Severe);
        assert_eq!(info.index, 3);
        assert_eq!(info.color, "#ff9600");
        let json = serde_json::to_value(&info).unwrap();
        assert_eq!(json["id"], "severe");
    }
}
