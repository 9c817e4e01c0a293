//! Forecast normalization
//!
//! This module turns a raw sample set into a [`Forecast`]:
//! - Current conditions built from the current reading at the query instant
//! - Series entries parsed, filtered to the upcoming window, sorted and deduplicated
//! - Upcoming list capped at the configured length
//!
//! A missing or unusable current reading fails the whole call. Problems with
//! individual series entries are skipped and reported as diagnostics.

use chrono::{DateTime, FixedOffset, NaiveDateTime, TimeZone, Utc};
use log::{debug, warn};

use crate::config::NormalizerConfig;
use crate::error::WetBulbError;
use crate::types::{
    Conditions, DiagnosticKind, Forecast, ForecastDiagnostic, RawForecast, RawSeriesEntry,
};

/// Timestamp layouts accepted when the string carries no zone offset
const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M"];

/// Normalizer for converting raw samples into an ordered forecast
#[derive(Debug, Clone, Default)]
pub struct ForecastNormalizer {
    config: NormalizerConfig,
}

impl ForecastNormalizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: NormalizerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &NormalizerConfig {
        &self.config
    }

    /// Normalize a raw sample set relative to `query_instant`
    pub fn normalize(
        &self,
        raw: &RawForecast,
        query_instant: DateTime<Utc>,
    ) -> Result<Forecast, WetBulbError> {
        let current = build_current(raw, query_instant)?;

        let threshold = query_instant - self.config.past_tolerance();
        let mut diagnostics = Vec::new();
        let mut upcoming: Vec<(usize, Conditions)> = Vec::with_capacity(raw.hourly.len());

        for (index, entry) in raw.hourly.iter().enumerate() {
            match parse_entry(entry, raw.utc_offset_seconds) {
                Ok(conditions) if conditions.timestamp() > threshold => {
                    upcoming.push((index, conditions));
                }
                Ok(conditions) => {
                    debug!(
                        "Dropping series entry {index} at {} (not after {threshold})",
                        conditions.timestamp()
                    );
                }
                Err(e) => {
                    warn!("Skipping series entry {index}: {e}");
                    diagnostics.push(ForecastDiagnostic {
                        index,
                        kind: DiagnosticKind::MalformedEntry,
                        message: e.to_string(),
                    });
                }
            }
        }

        // Stable sort keeps source order among equal timestamps, so the first occurrence wins
        upcoming.sort_by_key(|(_, conditions)| conditions.timestamp());

        let mut deduped: Vec<Conditions> = Vec::with_capacity(upcoming.len());
        for (index, conditions) in upcoming {
            let duplicate = deduped
                .last()
                .is_some_and(|previous| previous.timestamp() == conditions.timestamp());
            if duplicate {
                debug!(
                    "Dropping series entry {index}: duplicate timestamp {}",
                    conditions.timestamp()
                );
                diagnostics.push(ForecastDiagnostic {
                    index,
                    kind: DiagnosticKind::DuplicateTimestamp,
                    message: format!(
                        "duplicate timestamp {}",
                        conditions.timestamp().to_rfc3339()
                    ),
                });
            } else {
                deduped.push(conditions);
            }
        }

        if deduped.len() > self.config.max_entries {
            debug!(
                "Truncating forecast from {} to {} entries",
                deduped.len(),
                self.config.max_entries
            );
            deduped.truncate(self.config.max_entries);
        }

        diagnostics.sort_by_key(|d| d.index);

        debug!(
            "Normalized {} series entries into {} upcoming ({} diagnostics)",
            raw.hourly.len(),
            deduped.len(),
            diagnostics.len()
        );

        Ok(Forecast {
            current,
            upcoming: deduped,
            diagnostics,
        })
    }
}

fn build_current(
    raw: &RawForecast,
    query_instant: DateTime<Utc>,
) -> Result<Conditions, WetBulbError> {
    let sample = raw.current.as_ref().ok_or_else(|| {
        WetBulbError::NoCurrentConditions("weather source returned no current sample".to_string())
    })?;

    if !sample.temperature.is_finite() || !sample.humidity.is_finite() {
        return Err(WetBulbError::NoCurrentConditions(format!(
            "current sample is unusable (temperature {}, humidity {})",
            sample.temperature, sample.humidity
        )));
    }

    Ok(Conditions::new(
        sample.temperature,
        sample.humidity,
        sample.wind,
        query_instant,
    ))
}

fn parse_entry(
    entry: &RawSeriesEntry,
    utc_offset_seconds: i32,
) -> Result<Conditions, WetBulbError> {
    let time = entry.time.as_deref().ok_or_else(|| {
        WetBulbError::MalformedForecastEntry("timestamp missing".to_string())
    })?;
    let timestamp = parse_timestamp(time, utc_offset_seconds)?;
    let temperature = require_value(entry.temperature, "temperature", time)?;
    let humidity = require_value(entry.humidity, "humidity", time)?;
    let wind = require_value(entry.wind, "wind", time)?;

    Ok(Conditions::new(temperature, humidity, wind, timestamp))
}

fn require_value(value: Option<f64>, field: &str, time: &str) -> Result<f64, WetBulbError> {
    match value {
        Some(v) if v.is_finite() => Ok(v),
        Some(v) => Err(WetBulbError::MalformedForecastEntry(format!(
            "{field} at {time} is not finite ({v})"
        ))),
        None => Err(WetBulbError::MalformedForecastEntry(format!(
            "{field} missing at {time}"
        ))),
    }
}

/// Parse a series timestamp.
///
/// RFC 3339 strings use their own offset. Zone-less `YYYY-MM-DDTHH:MM[:SS]`
/// strings are read as local time at `utc_offset_seconds`.
pub fn parse_timestamp(
    time: &str,
    utc_offset_seconds: i32,
) -> Result<DateTime<Utc>, WetBulbError> {
    let time = time.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(time) {
        return Ok(dt.with_timezone(&Utc));
    }

    let offset = FixedOffset::east_opt(utc_offset_seconds).ok_or_else(|| {
        WetBulbError::MalformedForecastEntry(format!("invalid UTC offset {utc_offset_seconds}s"))
    })?;

    NAIVE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(time, format).ok())
        .and_then(|naive| offset.from_local_datetime(&naive).single())
        .map(|dt| dt.with_timezone(&Utc))
        .ok_or_else(|| {
            WetBulbError::MalformedForecastEntry(format!("unparseable timestamp '{time}'"))
        })
}
