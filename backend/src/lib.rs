//! # Signal Cycle Backend
//!
//! Green-time allocation for groups of traffic signals sharing one cycle.
//!
//! Each signal reports how many vehicles are waiting and how fast it can
//! discharge them. The allocator turns that into a demand weight, boosts the
//! weight of signals currently inside a registered peak window, and splits
//! the cycle time in proportion to the weights.
//!
//! ## Architecture
//!
//! - [`models`]: time-of-day, peak intervals, signal observations and results
//! - [`db`]: persistence of peak windows (in-memory and JSON-lines file stores)
//! - [`services`]: peak window registry, demand estimators, cycle allocator
//! - [`config`]: TOML + environment configuration
//! - [`http`]: Axum-based REST API
//!
//! ## Example
//!
//! ```
//! use signal_cycle::models::{CycleRequest, PeakWindowEntry, SignalObservation};
//! use signal_cycle::services::{CycleAllocator, PeakWindowSnapshot};
//!
//! let peaks = PeakWindowSnapshot::from_entries(&[PeakWindowEntry::new(1, ["08:00-09:00"])]).unwrap();
//! let request = CycleRequest::new(
//!     120.0,
//!     vec![SignalObservation::new(1, 50, 3.0), SignalObservation::new(2, 30, 2.0)],
//! );
//! let result = CycleAllocator::default()
//!     .allocate(&request, "08:30".parse().unwrap(), &peaks)
//!     .unwrap();
//! assert_eq!(result.allocations[0].allocated_time, 75.0);
//! assert_eq!(result.allocations[1].allocated_time, 45.0);
//! ```

pub mod config;
pub mod db;
pub mod models;
pub mod services;

#[cfg(feature = "http-server")]
pub mod http;
