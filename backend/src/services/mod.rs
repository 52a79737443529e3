//! Service layer: peak window registry, demand estimation and cycle
//! allocation.
//!
//! Services sit between the persistence layer (`db`) and the transports
//! (`http`). Allocation itself is pure; only registration touches the store.

pub mod allocator;
pub mod clock;
pub mod cycle;
pub mod demand;
pub mod registry;

pub use allocator::{round_allocation, AllocationError, CycleAllocator, ALLOCATION_DECIMALS};
pub use clock::{Clock, FixedClock, SystemClock};
pub use cycle::{CycleOutcome, CycleService};
pub use demand::{DemandEstimator, LinearDemand, RegressionDemand, PEAK_MULTIPLIER};
pub use registry::{PeakWindowRegistry, PeakWindowSnapshot, RegistryError, RegistryOptions};
