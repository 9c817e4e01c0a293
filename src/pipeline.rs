//! Pipeline orchestration
//!
//! This module provides the public API for the wet-bulb engine.
//! It orchestrates the full pipeline from raw weather JSON to a heat report.

use chrono::{DateTime, Utc};

use crate::adapters::{OpenMeteoAdapter, WeatherPayloadAdapter};
use crate::config::NormalizerConfig;
use crate::encoder::ReportEncoder;
use crate::error::WetBulbError;
use crate::normalizer::ForecastNormalizer;
use crate::types::{Forecast, HeatReport};

/// Convert a raw Open-Meteo forecast response into a heat report JSON string.
///
/// # Arguments
/// * `raw_json` - Raw Open-Meteo `v1/forecast` response JSON
/// * `query_instant` - Instant the forecast is evaluated against ("now")
///
/// # Example
/// ```ignore
/// let report = open_meteo_to_report(open_meteo_json, Utc::now())?;
/// ```
pub fn open_meteo_to_report(
    raw_json: &str,
    query_instant: DateTime<Utc>,
) -> Result<String, WetBulbError> {
    HeatStressProcessor::new().process_open_meteo(raw_json, query_instant)
}

/// Processor holding configuration and a stable encoder identity across calls.
///
/// Pipeline stages:
/// 1. WeatherPayloadAdapter - Parse source JSON into raw samples
/// 2. ForecastNormalizer - Build current conditions and the upcoming forecast
/// 3. ReportEncoder - Classify each entry and encode the heat report
pub struct HeatStressProcessor {
    normalizer: ForecastNormalizer,
    encoder: ReportEncoder,
}

impl Default for HeatStressProcessor {
    fn default() -> Self {
        Self::new()
    }
}

impl HeatStressProcessor {
    /// Create a new processor with default settings
    pub fn new() -> Self {
        Self {
            normalizer: ForecastNormalizer::new(),
            encoder: ReportEncoder::new(),
        }
    }

    /// Create a processor with a validated configuration
    pub fn with_config(config: NormalizerConfig) -> Result<Self, WetBulbError> {
        config.validate()?;
        Ok(Self {
            normalizer: ForecastNormalizer::with_config(config),
            encoder: ReportEncoder::new(),
        })
    }

    /// Replace the encoder, e.g. to pin the report instance ID
    pub fn with_encoder(mut self, encoder: ReportEncoder) -> Self {
        self.encoder = encoder;
        self
    }

    pub fn config(&self) -> &NormalizerConfig {
        self.normalizer.config()
    }

    /// Parse and normalize an Open-Meteo payload without classifying it
    pub fn forecast_open_meteo(
        &self,
        raw_json: &str,
        query_instant: DateTime<Utc>,
    ) -> Result<Forecast, WetBulbError> {
        self.forecast_with_adapter(&OpenMeteoAdapter, raw_json, query_instant)
    }

    /// Build a heat report from an Open-Meteo payload
    pub fn report_open_meteo(
        &self,
        raw_json: &str,
        query_instant: DateTime<Utc>,
    ) -> Result<HeatReport, WetBulbError> {
        let forecast = self.forecast_open_meteo(raw_json, query_instant)?;
        self.encoder.encode(&forecast, query_instant)
    }

    /// Build a heat report JSON string from an Open-Meteo payload
    pub fn process_open_meteo(
        &self,
        raw_json: &str,
        query_instant: DateTime<Utc>,
    ) -> Result<String, WetBulbError> {
        let forecast = self.forecast_open_meteo(raw_json, query_instant)?;
        self.encoder.encode_to_json(&forecast, query_instant)
    }

    fn forecast_with_adapter(
        &self,
        adapter: &dyn WeatherPayloadAdapter,
        raw_json: &str,
        query_instant: DateTime<Utc>,
    ) -> Result<Forecast, WetBulbError> {
        let raw = adapter.parse(raw_json)?;
        self.normalizer.normalize(&raw, query_instant)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::guideline::Guideline;
    use chrono::TimeZone;

    /// 12:00 UTC == 21:00 in Tokyo
    fn query_instant() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 7, 15, 12, 0, 0).unwrap()
    }

    fn sample_open_meteo_json() -> &'static str {
        r#"{
            "latitude": 35.66,
            "longitude": 139.7,
            "utc_offset_seconds": 32400,
            "current": {
                "temperature_2m": 26.0,
                "wind_speed_10m": 4.0,
                "relative_humidity_2m": 80
            },
            "hourly": {
                "time": [
                    "2024-07-15T19:00",
                    "2024-07-15T20:00",
                    "2024-07-15T21:00",
                    "2024-07-15T23:00",
                    "2024-07-15T22:00",
                    "bogus"
                ],
                "temperature_2m": [27.0, 26.5, 26.0, 35.0, 30.0, 30.0],
                "wind_speed_10m": [3.0, 3.0, 3.0, 3.0, 3.0, 3.0],
                "relative_humidity_2m": [80, 80, 80, 80, 70, 70]
            }
        }"#
    }

    #[test]
    fn test_open_meteo_to_report() {
        let json = open_meteo_to_report(sample_open_meteo_json(), query_instant()).unwrap();
        let report: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(report["producer"]["name"], "wetbulb");
        assert_eq!(report["current"]["band"]["id"], "caution");

        // 19:00-21:00 local are at or before the query instant; 22:00 sorts before 23:00
        let upcoming = report["upcoming"].as_array().unwrap();
        assert_eq!(upcoming.len(), 2);
        assert_eq!(upcoming[0]["timestamp_utc"], "2024-07-15T13:00:00Z");
        assert_eq!(upcoming[0]["band"]["id"], "warning");
        assert_eq!(upcoming[1]["timestamp_utc"], "2024-07-15T14:00:00Z");
        assert_eq!(upcoming[1]["band"]["id"], "danger");

        let diagnostics = report["diagnostics"].as_array().unwrap();
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0]["index"], 5);
        assert_eq!(diagnostics[0]["kind"], "malformed_entry");
    }

    #[test]
    fn test_report_with_tolerance() {
        let processor = HeatStressProcessor::with_config(NormalizerConfig {
            past_tolerance_minutes: 60,
            ..Default::default()
        })
        .unwrap();
        let report = processor
            .report_open_meteo(sample_open_meteo_json(), query_instant())
            .unwrap();

        // 21:00 local (== now) is now inside the window
        assert_eq!(report.upcoming.len(), 3);
        assert_eq!(report.upcoming[0].hours_ahead, 0);
        assert_eq!(report.peak.unwrap().band.id, Guideline::Danger);
    }

    #[test]
    fn test_missing_current() {
        let result = open_meteo_to_report(
            r#"{"hourly": {"time": [], "temperature_2m": []}}"#,
            query_instant(),
        );
        assert!(matches!(result, Err(WetBulbError::NoCurrentConditions(_))));
    }

    #[test]
    fn test_current_with_null_humidity() {
        let result = HeatStressProcessor::new().forecast_open_meteo(
            r#"{"current": {"temperature_2m": 29.0, "wind_speed_10m": 1.0, "relative_humidity_2m": null}}"#,
            query_instant(),
        );
        assert!(matches!(result, Err(WetBulbError::NoCurrentConditions(_))));
    }

    #[test]
    fn test_current_with_missing_humidity() {
        let result = HeatStressProcessor::new().forecast_open_meteo(
            r#"{"current": {"temperature_2m": 29.0, "wind_speed_10m": 1.0}}"#,
            query_instant(),
        );
        assert!(matches!(result, Err(WetBulbError::NoCurrentConditions(_))));
    }

    #[test]
    fn test_malformed_hourly_items_are_skipped() {
        let forecast = HeatStressProcessor::new()
            .forecast_open_meteo(
                r#"{
                "current": {"temperature_2m": 29.0, "wind_speed_10m": 1.0, "relative_humidity_2m": 70},
                "hourly": {
                    "time": ["2024-07-15T13:00", null, "2024-07-15T15:00", "2024-07-15T16:00"],
                    "temperature_2m": [29.0, 29.5, 30.0, "hot"],
                    "wind_speed_10m": [1.0, 1.0, 1.0, 1.0],
                    "relative_humidity_2m": [70, 70, 70, 70]
                }
            }"#,
                query_instant(),
            )
            .unwrap();

        assert_eq!(forecast.upcoming.len(), 2);
        let indices: Vec<usize> = forecast.diagnostics.iter().map(|d| d.index).collect();
        assert_eq!(indices, vec![1, 3]);
    }

    #[test]
    fn test_no_hourly_section() {
        let processor = HeatStressProcessor::new();
        let forecast = processor
            .forecast_open_meteo(
                r#"{"current": {"temperature_2m": 30.0, "wind_speed_10m": 1.0, "relative_humidity_2m": 50}}"#,
                query_instant(),
            )
            .unwrap();
        assert!(forecast.upcoming.is_empty());
        assert_eq!(forecast.current.timestamp(), query_instant());
    }

    #[test]
    fn test_invalid_json() {
        let result = open_meteo_to_report("not valid json", query_instant());
        assert!(matches!(result, Err(WetBulbError::JsonError(_))));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let result = HeatStressProcessor::with_config(NormalizerConfig {
            max_entries: 0,
            ..Default::default()
        });
        assert!(matches!(result, Err(WetBulbError::ConfigError(_))));
    }

    #[test]
    fn test_processor_is_repeatable() {
        let processor = HeatStressProcessor::new();
        let first = processor
            .process_open_meteo(sample_open_meteo_json(), query_instant())
            .unwrap();
        let second = processor
            .process_open_meteo(sample_open_meteo_json(), query_instant())
            .unwrap();
        assert_eq!(first, second);
    }
}
