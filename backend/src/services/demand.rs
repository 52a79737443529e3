//! Demand estimation strategies.
//!
//! A demand estimator turns one signal observation into a non-negative weight.
//! The allocator only cares about the relative size of these weights: each
//! signal receives `weight / sum(weights)` of the cycle.

use std::fmt;

use crate::models::SignalObservation;

/// Weight applied to a signal's vehicle count while it is inside a peak window.
pub const PEAK_MULTIPLIER: f64 = 1.5;

/// Strategy for computing a signal's demand weight.
pub trait DemandEstimator: Send + Sync + fmt::Debug {
    /// Estimate the demand of `signal`.
    ///
    /// Callers guarantee `signal.rate > 0`. The returned value must be finite
    /// and non-negative; anything else is rejected by the allocator.
    fn estimate(&self, signal: &SignalObservation, is_peak: bool, total_cycle_time: f64) -> f64;

    fn name(&self) -> &'static str;
}

/// Queue length divided by throughput, weighted during peak windows.
///
/// `demand = quantity * (peak_multiplier if peak else 1) / rate`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearDemand {
    pub peak_multiplier: f64,
}

impl LinearDemand {
    pub fn new(peak_multiplier: f64) -> Self {
        Self { peak_multiplier }
    }
}

impl Default for LinearDemand {
    fn default() -> Self {
        Self::new(PEAK_MULTIPLIER)
    }
}

impl DemandEstimator for LinearDemand {
    fn estimate(&self, signal: &SignalObservation, is_peak: bool, _total_cycle_time: f64) -> f64 {
        let weight = if is_peak { self.peak_multiplier } else { 1.0 };
        signal.quantity as f64 * weight / signal.rate
    }

    fn name(&self) -> &'static str {
        "linear"
    }
}

/// Linear regression over `[quantity, rate, peak, total_cycle_time]`.
///
/// The prediction is an "ideal green time" for the signal; negative
/// predictions are clamped to zero. Peak status enters only through its
/// coefficient, so no multiplier is applied on top.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RegressionDemand {
    pub intercept: f64,
    pub coefficients: [f64; 4],
}

impl RegressionDemand {
    pub fn new(intercept: f64, coefficients: [f64; 4]) -> Self {
        Self {
            intercept,
            coefficients,
        }
    }

    fn features(signal: &SignalObservation, is_peak: bool, total_cycle_time: f64) -> [f64; 4] {
        [
            signal.quantity as f64,
            signal.rate,
            if is_peak { 1.0 } else { 0.0 },
            total_cycle_time,
        ]
    }
}

impl DemandEstimator for RegressionDemand {
    fn estimate(&self, signal: &SignalObservation, is_peak: bool, total_cycle_time: f64) -> f64 {
        let prediction = Self::features(signal, is_peak, total_cycle_time)
            .iter()
            .zip(self.coefficients.iter())
            .fold(self.intercept, |acc, (x, w)| acc + x * w);
        prediction.max(0.0)
    }

    fn name(&self) -> &'static str {
        "regression"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_off_peak() {
        let est = LinearDemand::default();
        let d = est.estimate(&SignalObservation::new(2, 30, 2.0), false, 120.0);
        assert_eq!(d, 15.0);
    }

    #[test]
    fn test_linear_peak_uses_multiplier() {
        let est = LinearDemand::default();
        let d = est.estimate(&SignalObservation::new(1, 50, 2.0), true, 120.0);
        assert_eq!(d, 37.5);

        let custom = LinearDemand::new(2.0);
        assert_eq!(custom.estimate(&SignalObservation::new(1, 50, 2.0), true, 120.0), 50.0);
    }

    #[test]
    fn test_linear_zero_quantity() {
        let est = LinearDemand::default();
        assert_eq!(est.estimate(&SignalObservation::new(1, 0, 4.0), true, 60.0), 0.0);
    }

    #[test]
    fn test_regression_prediction() {
        let est = RegressionDemand::new(1.0, [0.5, -2.0, 4.0, 0.1]);
        // 1 + 0.5*20 - 2*2 + 4*1 + 0.1*120 = 23
        let d = est.estimate(&SignalObservation::new(1, 20, 2.0), true, 120.0);
        assert!((d - 23.0).abs() < 1e-9);
    }

    #[test]
    fn test_regression_clamps_negative() {
        let est = RegressionDemand::new(-100.0, [0.0; 4]);
        assert_eq!(est.estimate(&SignalObservation::new(1, 20, 2.0), false, 120.0), 0.0);
    }
}
