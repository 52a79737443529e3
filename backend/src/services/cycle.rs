//! Cycle service: the two operations exposed to drivers.
//!
//! - [`CycleService::register_peak_hours`] replaces the peak window registry
//! - [`CycleService::allocate_cycle`] splits a cycle using the current time
//!
//! The service owns the registry (and through it the store), the allocator
//! and the clock. Transports hold it behind an `Arc`.

use std::sync::Arc;

use super::allocator::{AllocationError, CycleAllocator};
use super::clock::{Clock, SystemClock};
use super::registry::{PeakWindowRegistry, RegistryError};
use crate::models::{AllocationResult, CycleRequest, PeakWindowEntry, TimeOfDay};

/// Allocation outcome together with the time it was evaluated at.
#[derive(Debug, Clone, PartialEq)]
pub struct CycleOutcome {
    pub current_time: TimeOfDay,
    pub result: AllocationResult,
}

pub struct CycleService {
    registry: Arc<PeakWindowRegistry>,
    allocator: CycleAllocator,
    clock: Arc<dyn Clock>,
}

impl CycleService {
    /// Service with the default linear allocator and the system clock.
    pub fn new(registry: Arc<PeakWindowRegistry>) -> Self {
        Self::with_parts(registry, CycleAllocator::default(), Arc::new(SystemClock))
    }

    pub fn with_parts(
        registry: Arc<PeakWindowRegistry>,
        allocator: CycleAllocator,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            registry,
            allocator,
            clock,
        }
    }

    pub fn registry(&self) -> &Arc<PeakWindowRegistry> {
        &self.registry
    }

    pub fn allocator(&self) -> &CycleAllocator {
        &self.allocator
    }

    /// Replace all registered peak windows. Returns the number of signals
    /// registered.
    pub async fn register_peak_hours(
        &self,
        entries: &[PeakWindowEntry],
    ) -> Result<usize, RegistryError> {
        self.registry.register(entries).await
    }

    /// Allocate `request` at `current_time`, or at the clock's time when
    /// `None`.
    pub fn allocate_cycle(
        &self,
        request: &CycleRequest,
        current_time: Option<TimeOfDay>,
    ) -> Result<CycleOutcome, AllocationError> {
        let current_time = current_time.unwrap_or_else(|| self.clock.now());
        let snapshot = self.registry.snapshot();
        let result = self.allocator.allocate(request, current_time, &snapshot)?;
        Ok(CycleOutcome {
            current_time,
            result,
        })
    }
}
