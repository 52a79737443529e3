//! Cycle allocation.
//!
//! Splits a fixed cycle budget across signals in proportion to their demand.
//! Allocation is a pure function of the request, the current time and a
//! registry snapshot: no state is kept between calls.

use std::collections::HashSet;
use std::sync::Arc;

use super::demand::{DemandEstimator, LinearDemand};
use super::registry::PeakWindowSnapshot;
use crate::models::{AllocationResult, CycleRequest, SignalAllocation, SignalId, TimeOfDay};

/// Decimal places kept in each allocated time.
pub const ALLOCATION_DECIMALS: u32 = 2;

/// Reasons an allocation request is rejected. No partial result is ever
/// returned alongside an error.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AllocationError {
    #[error("Cycle request contains no signals")]
    EmptyRequest,

    #[error("Total cycle time must be positive and finite, got {0}")]
    InvalidCycleTime(f64),

    #[error("Signal {0} appears more than once in the request")]
    DuplicateSignal(SignalId),

    #[error("Signal {signal_id} has invalid rate {rate}; rate must be greater than zero")]
    InvalidRate { signal_id: SignalId, rate: f64 },

    #[error("Demand estimate {value} for signal {signal_id} is not a finite non-negative number")]
    InvalidDemand { signal_id: SignalId, value: f64 },

    #[error("Total demand across {signals} signals is zero; nothing to distribute against")]
    ZeroDemand { signals: usize },
}

/// Round to [`ALLOCATION_DECIMALS`] places.
pub fn round_allocation(value: f64) -> f64 {
    let factor = 10f64.powi(ALLOCATION_DECIMALS as i32);
    (value * factor).round() / factor
}

/// Proportional cycle allocator.
#[derive(Debug, Clone)]
pub struct CycleAllocator {
    estimator: Arc<dyn DemandEstimator>,
}

impl Default for CycleAllocator {
    fn default() -> Self {
        Self::new(LinearDemand::default())
    }
}

impl CycleAllocator {
    pub fn new<E: DemandEstimator + 'static>(estimator: E) -> Self {
        Self {
            estimator: Arc::new(estimator),
        }
    }

    pub fn with_estimator(estimator: Arc<dyn DemandEstimator>) -> Self {
        Self { estimator }
    }

    pub fn estimator(&self) -> &dyn DemandEstimator {
        self.estimator.as_ref()
    }

    fn validate(request: &CycleRequest) -> Result<(), AllocationError> {
        if request.signals.is_empty() {
            return Err(AllocationError::EmptyRequest);
        }
        let total = request.total_cycle_time;
        if !total.is_finite() || total <= 0.0 {
            return Err(AllocationError::InvalidCycleTime(total));
        }

        let mut seen = HashSet::with_capacity(request.signals.len());
        for signal in &request.signals {
            if !seen.insert(signal.signal_id) {
                return Err(AllocationError::DuplicateSignal(signal.signal_id));
            }
            if !signal.rate.is_finite() || signal.rate <= 0.0 {
                return Err(AllocationError::InvalidRate {
                    signal_id: signal.signal_id,
                    rate: signal.rate,
                });
            }
        }
        Ok(())
    }

    /// Per-signal demand in request order.
    pub fn demands(
        &self,
        request: &CycleRequest,
        current_time: TimeOfDay,
        peaks: &PeakWindowSnapshot,
    ) -> Result<Vec<f64>, AllocationError> {
        Self::validate(request)?;

        request
            .signals
            .iter()
            .map(|signal| {
                let is_peak = peaks.is_peak(signal.signal_id, current_time);
                let value = self
                    .estimator
                    .estimate(signal, is_peak, request.total_cycle_time);
                if !value.is_finite() || value < 0.0 {
                    return Err(AllocationError::InvalidDemand {
                        signal_id: signal.signal_id,
                        value,
                    });
                }
                log::trace!(
                    "signal={} quantity={} rate={} peak={} demand={}",
                    signal.signal_id,
                    signal.quantity,
                    signal.rate,
                    is_peak,
                    value
                );
                Ok(value)
            })
            .collect()
    }

    /// Distribute `request.total_cycle_time` across the request's signals.
    ///
    /// Each signal gets `demand / total_demand * total_cycle_time`, rounded to
    /// [`ALLOCATION_DECIMALS`] places independently, so the sum can differ
    /// from the cycle time by at most `0.005 * signals`.
    pub fn allocate(
        &self,
        request: &CycleRequest,
        current_time: TimeOfDay,
        peaks: &PeakWindowSnapshot,
    ) -> Result<AllocationResult, AllocationError> {
        let demands = self.demands(request, current_time, peaks)?;
        let largest = demands.iter().copied().fold(0.0_f64, f64::max);
        if largest <= 0.0 {
            return Err(AllocationError::ZeroDemand {
                signals: demands.len(),
            });
        }

        // Normalize by the largest demand so the sum stays finite even when
        // individual demands sit near f64::MAX.
        let weights: Vec<f64> = demands.iter().map(|d| d / largest).collect();
        let total_weight: f64 = weights.iter().sum();

        let allocations = request
            .signals
            .iter()
            .zip(weights)
            .map(|(signal, weight)| SignalAllocation {
                signal_id: signal.signal_id,
                allocated_time: round_allocation(
                    weight / total_weight * request.total_cycle_time,
                ),
            })
            .collect();

        log::debug!(
            "Allocated {:.2}s across {} signals at {} using {} demand",
            request.total_cycle_time,
            request.signals.len(),
            current_time,
            self.estimator.name()
        );
        Ok(AllocationResult { allocations })
    }
}
