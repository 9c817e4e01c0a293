//! Open-Meteo adapter
//!
//! Parses `v1/forecast` responses requested with
//! `current=temperature_2m,wind_speed_10m,relative_humidity_2m` and the same
//! `hourly` variables. Hourly values arrive as parallel arrays indexed by
//! `time`.
//!
//! Only a payload that is not a JSON object fails the parse. Fields are read
//! leniently: nulls, wrong types and short arrays become missing values, so a
//! bad `current` block surfaces as no current conditions and a bad hourly item
//! is skipped by the normalizer.

use log::warn;
use serde::Deserialize;
use serde_json::Value;

use super::WeatherPayloadAdapter;
use crate::error::WetBulbError;
use crate::types::{RawForecast, RawSample, RawSeriesEntry};

/// Open-Meteo payload adapter
pub struct OpenMeteoAdapter;

impl WeatherPayloadAdapter for OpenMeteoAdapter {
    fn parse(&self, raw_json: &str) -> Result<RawForecast, WetBulbError> {
        let value: Value = serde_json::from_str(raw_json)?;
        if !value.is_object() {
            return Err(WetBulbError::ParseError(
                "expected a JSON object at the top level".to_string(),
            ));
        }
        let payload: OpenMeteoPayload =
            serde_json::from_value(value).map_err(|e| WetBulbError::ParseError(e.to_string()))?;

        Ok(RawForecast {
            current: payload.current.as_ref().and_then(convert_current),
            hourly: payload
                .hourly
                .as_ref()
                .map(convert_hourly)
                .unwrap_or_default(),
            utc_offset_seconds: payload
                .utc_offset_seconds
                .as_ref()
                .and_then(Value::as_i64)
                .and_then(|secs| i32::try_from(secs).ok())
                .unwrap_or(0),
        })
    }
}

/// Current block, or `None` when temperature or humidity is unusable.
/// Wind has no effect on the estimate and defaults to 0 when missing.
fn convert_current(current: &Value) -> Option<RawSample> {
    let temperature = number(current.get("temperature_2m"));
    let humidity = number(current.get("relative_humidity_2m"));

    match (temperature, humidity) {
        (Some(temperature), Some(humidity)) => Some(RawSample {
            temperature,
            humidity,
            wind: number(current.get("wind_speed_10m")).unwrap_or(0.0),
        }),
        _ => {
            warn!("Ignoring unusable current block: {current}");
            None
        }
    }
}

fn convert_hourly(hourly: &Value) -> Vec<RawSeriesEntry> {
    let times = array(hourly, "time");
    let temperatures = array(hourly, "temperature_2m");
    let humidities = array(hourly, "relative_humidity_2m");
    let winds = array(hourly, "wind_speed_10m");

    times
        .iter()
        .enumerate()
        .map(|(i, time)| RawSeriesEntry {
            time: time.as_str().map(str::to_string),
            temperature: number(temperatures.get(i)),
            humidity: number(humidities.get(i)),
            wind: number(winds.get(i)),
        })
        .collect()
}

fn array<'a>(block: &'a Value, key: &str) -> &'a [Value] {
    block
        .get(key)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

fn number(value: Option<&Value>) -> Option<f64> {
    value.and_then(Value::as_f64)
}

// ============================================================================
// Open-Meteo API types
// ============================================================================

#[derive(Debug, Deserialize)]
struct OpenMeteoPayload {
    current: Option<Value>,
    hourly: Option<Value>,
    utc_offset_seconds: Option<Value>,
}
