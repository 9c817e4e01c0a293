//! Wet-bulb temperature estimation
//!
//! Implements the Stull (2011) empirical regression, which estimates wet-bulb
//! temperature from dry-bulb temperature (°C) and relative humidity (%) at
//! standard sea-level pressure.
//!
//! Known limitation: wind speed is carried by [`Conditions`](crate::types::Conditions)
//! but has no term in this regression, so it does not influence the estimate.
//! Inputs are not range-checked; out-of-domain values still produce a number
//! (possibly NaN, e.g. humidity below -8.31).

const SQRT_COEFF: f64 = 0.151977;
const SQRT_OFFSET: f64 = 8.313659;
const HUMIDITY_OFFSET: f64 = 1.676331;
const POWER_COEFF: f64 = 0.00391838;
const ATAN_COEFF: f64 = 0.023101;
const CONSTANT: f64 = 4.686035;

/// Estimator for wet-bulb temperature
pub struct WetBulbEstimator;

impl WetBulbEstimator {
    /// Estimate wet-bulb temperature (°C) from temperature (°C) and relative humidity (%)
    pub fn estimate(temperature: f64, humidity: f64) -> f64 {
        estimate_wet_bulb(temperature, humidity)
    }
}

/// Estimate wet-bulb temperature (°C).
///
/// ```text
/// Tw = T·atan(0.151977·√(H + 8.313659)) + atan(T + H) − atan(H − 1.676331)
///      + 0.00391838·H^1.5·atan(0.023101·H) − 4.686035
/// ```
pub fn estimate_wet_bulb(temperature: f64, humidity: f64) -> f64 {
    let t = temperature;
    let h = humidity;

    let term1 = t * (SQRT_COEFF * (h + SQRT_OFFSET).sqrt()).atan();
    let term2 = (t + h).atan();
    let term3 = (h - HUMIDITY_OFFSET).atan();
    let term4 = POWER_COEFF * h.powf(1.5) * (ATAN_COEFF * h).atan();

    term1 + term2 - term3 + term4 - CONSTANT
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: f64, expected: f64) {
        let tolerance = 1e-9 * expected.abs().max(1.0);
        assert!(
            (actual - expected).abs() < tolerance,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn test_reference_value() {
        let estimate = estimate_wet_bulb(26.0, 80.0);
        assert!(estimate > 23.2);
        assert!(estimate < 23.3);
    }

    #[test]
    fn test_matches_regression_values() {
        assert_close(estimate_wet_bulb(26.0, 80.0), 23.289543891592203);
        assert_close(estimate_wet_bulb(20.0, 50.0), 13.699341968988136);
        assert_close(estimate_wet_bulb(35.0, 75.0), 31.100776617508036);
        assert_close(estimate_wet_bulb(30.0, 40.0), 20.44920202182018);
        assert_close(estimate_wet_bulb(-5.0, 30.0), -8.074803370594836);
        assert_close(estimate_wet_bulb(0.0, 0.0), -3.6531108341573972);
    }

    #[test]
    fn test_deterministic() {
        for &(t, h) in &[(26.0, 80.0), (41.3, 12.5), (-12.0, 99.0)] {
            let first = estimate_wet_bulb(t, h);
            let second = WetBulbEstimator::estimate(t, h);
            assert_eq!(first.to_bits(), second.to_bits());
        }
    }

    #[test]
    fn test_out_of_range_inputs_are_not_rejected() {
        // Humidity above 100% still yields a finite number
        assert!(estimate_wet_bulb(30.0, 150.0).is_finite());
        // Negative humidity below the sqrt offset degrades to NaN rather than erroring
        assert!(estimate_wet_bulb(30.0, -20.0).is_nan());
    }

    #[test]
    fn test_wet_bulb_below_dry_bulb_in_typical_range() {
        for t in [15.0, 25.0, 35.0] {
            for h in [20.0, 50.0, 80.0] {
                assert!(estimate_wet_bulb(t, h) < t);
            }
        }
    }
}
