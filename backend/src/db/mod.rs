//! Persistence layer for the peak window registry.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │  PeakWindowRegistry (services::registry)                │
//! │  - in-memory snapshot, parsing, atomic swap             │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │ load at start / replace on register
//! ┌───────────────────▼─────────────────────────────────────┐
//! │  Service Layer (services.rs) - logging, error context   │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼─────────────────────────────────────┐
//! │  Repository Trait (repository/) - Abstract Interface    │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//!          ┌──────────┴──────────┐
//!  ┌───────▼─────────┐   ┌───────▼─────────┐
//!  │ LocalRepository │   │ FileRepository  │
//!  │   (in-memory)   │   │  (JSON lines)   │
//!  └─────────────────┘   └─────────────────┘
//! ```

pub mod factory;
pub mod repo_config;
pub mod repositories;
pub mod repository;
pub mod services;

pub use services::{health_check, load_peak_windows, replace_peak_windows};

pub use factory::{RepositoryFactory, RepositoryType};
pub use repo_config::RepositorySettings;
pub use repositories::{FileRepository, LocalRepository};
pub use repository::{ErrorContext, PeakWindowRepository, RepositoryError, RepositoryResult};
