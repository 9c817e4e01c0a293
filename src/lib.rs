//! Wetbulb - On-device heat-stress engine
//!
//! Wetbulb turns raw weather readings into heat-stress guidance through a
//! deterministic pipeline: source adaptation → forecast normalization →
//! wet-bulb estimation → guideline banding → report encoding.
//!
//! ## Modules
//!
//! - **Estimator**: Wet-bulb temperature from temperature and relative humidity
//! - **Guideline**: Six fixed risk bands keyed by wet-bulb temperature
//! - **Normalizer**: Current conditions plus an ordered, capped, future-only forecast

pub mod adapters;
pub mod config;
pub mod encoder;
pub mod error;
pub mod estimator;
pub mod guideline;
pub mod normalizer;
pub mod pipeline;
pub mod types;

// FFI bindings for C interop (always available for cdylib/staticlib builds)
pub mod ffi;

pub use config::NormalizerConfig;
pub use error::WetBulbError;
pub use estimator::{estimate_wet_bulb, WetBulbEstimator};
pub use guideline::{classify, Guideline};
pub use normalizer::ForecastNormalizer;
pub use pipeline::{open_meteo_to_report, HeatStressProcessor};
pub use types::{Conditions, Forecast, RawForecast, RawSample, RawSeriesEntry};

/// Wetbulb version embedded in all heat reports
pub const WETBULB_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Producer name for heat reports
pub const PRODUCER_NAME: &str = "wetbulb";
