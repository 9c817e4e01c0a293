//! Heat report encoding
//!
//! This module classifies a normalized [`Forecast`] and encodes it into a
//! [`HeatReport`] for the display layer.

use chrono::{DateTime, SecondsFormat, Utc};
use log::warn;
use uuid::Uuid;

use crate::error::WetBulbError;
use crate::guideline::Guideline;
use crate::types::{
    BandInfo, ClassifiedConditions, Conditions, DiagnosticKind, Forecast, ForecastDiagnostic,
    HeatReport, ReportProducer,
};
use crate::{PRODUCER_NAME, WETBULB_VERSION};

/// Current heat report schema version
pub const REPORT_VERSION: &str = "1.0.0";

/// Heat report encoder
pub struct ReportEncoder {
    instance_id: String,
}

impl Default for ReportEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportEncoder {
    /// Create a new encoder with a unique instance ID
    pub fn new() -> Self {
        Self {
            instance_id: Uuid::new_v4().to_string(),
        }
    }

    /// Create an encoder with a specific instance ID
    pub fn with_instance_id(instance_id: String) -> Self {
        Self { instance_id }
    }

    pub fn instance_id(&self) -> &str {
        &self.instance_id
    }

    /// Encode a forecast into a heat report.
    ///
    /// Fails with [`WetBulbError::InvalidInput`] if the current conditions
    /// cannot be classified. Unclassifiable upcoming entries are dropped and
    /// recorded in the report diagnostics.
    pub fn encode(
        &self,
        forecast: &Forecast,
        query_instant: DateTime<Utc>,
    ) -> Result<HeatReport, WetBulbError> {
        let current = classify_conditions(&forecast.current, query_instant)?;

        let mut diagnostics = forecast.diagnostics.clone();
        let mut upcoming = Vec::with_capacity(forecast.upcoming.len());
        for (position, conditions) in forecast.upcoming.iter().enumerate() {
            match classify_conditions(conditions, query_instant) {
                Ok(classified) => upcoming.push(classified),
                Err(e) => {
                    warn!("Dropping upcoming entry {position}: {e}");
                    diagnostics.push(ForecastDiagnostic {
                        index: position,
                        kind: DiagnosticKind::Unclassifiable,
                        message: e.to_string(),
                    });
                }
            }
        }

        let peak = find_peak(&upcoming);

        Ok(HeatReport {
            report_version: REPORT_VERSION.to_string(),
            producer: ReportProducer {
                name: PRODUCER_NAME.to_string(),
                version: WETBULB_VERSION.to_string(),
                instance_id: self.instance_id.clone(),
            },
            generated_for_utc: format_utc(query_instant),
            current,
            upcoming,
            peak,
            diagnostics,
        })
    }

    /// Encode to JSON string
    pub fn encode_to_json(
        &self,
        forecast: &Forecast,
        query_instant: DateTime<Utc>,
    ) -> Result<String, WetBulbError> {
        let report = self.encode(forecast, query_instant)?;
        serde_json::to_string_pretty(&report).map_err(WetBulbError::JsonError)
    }
}

fn classify_conditions(
    conditions: &Conditions,
    query_instant: DateTime<Utc>,
) -> Result<ClassifiedConditions, WetBulbError> {
    let guideline = Guideline::for_conditions(conditions)?;

    Ok(ClassifiedConditions {
        timestamp_utc: format_utc(conditions.timestamp()),
        hours_ahead: conditions.hours_from(query_instant),
        temperature_c: conditions.temperature(),
        humidity_pct: conditions.humidity(),
        wind_kmh: conditions.wind(),
        wet_bulb_c: conditions.wet_bulb_estimate(),
        band: BandInfo::from(guideline),
    })
}

/// Highest wet-bulb entry; the earliest wins on ties
fn find_peak(upcoming: &[ClassifiedConditions]) -> Option<ClassifiedConditions> {
    upcoming
        .iter()
        .fold(None, |peak: Option<&ClassifiedConditions>, candidate| match peak {
            Some(best) if best.wet_bulb_c >= candidate.wet_bulb_c => Some(best),
            _ => Some(candidate),
        })
        .cloned()
}

fn format_utc(instant: DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Secs, true)
}
