//! Normalizer configuration
//!
//! Defaults reproduce the standard forecast behavior: only strictly future
//! entries are kept and the list is capped at 24 hours.

use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::error::WetBulbError;

/// Default cap on the number of upcoming forecast entries
pub const DEFAULT_MAX_ENTRIES: usize = 24;

/// Configuration for [`ForecastNormalizer`](crate::normalizer::ForecastNormalizer)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizerConfig {
    /// How far before the query instant an entry may be and still count as
    /// upcoming. An entry is kept iff `timestamp > query_instant - tolerance`.
    pub past_tolerance_minutes: u32,
    /// Maximum number of upcoming entries
    pub max_entries: usize,
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        Self {
            past_tolerance_minutes: 0,
            max_entries: DEFAULT_MAX_ENTRIES,
        }
    }
}

impl NormalizerConfig {
    /// Parse and validate a JSON configuration. Missing fields take defaults.
    pub fn from_json(json: &str) -> Result<Self, WetBulbError> {
        let config: NormalizerConfig = serde_json::from_str(json)
            .map_err(|e| WetBulbError::ConfigError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn validate(&self) -> Result<(), WetBulbError> {
        if self.max_entries == 0 {
            return Err(WetBulbError::ConfigError(
                "max_entries must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    pub fn past_tolerance(&self) -> Duration {
        Duration::minutes(i64::from(self.past_tolerance_minutes))
    }
}
