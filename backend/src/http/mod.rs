//! HTTP server module.
//!
//! Exposes the cycle service as a small REST API:
//!
//! ```text
//! GET  /health
//! GET  /openapi.json
//! GET  /v1/peak-hours
//! PUT  /v1/peak-hours
//! GET  /v1/peak-hours/{signal_id}
//! POST /v1/cycles/allocate
//! ```
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │  HTTP Layer (axum handlers)                               │
//! │  - JSON (de)serialization, error -> status mapping        │
//! └───────────────────┬──────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼──────────────────────────────────────┐
//! │  Service Layer (services::CycleService)                   │
//! │  - peak window registry, allocator, clock                 │
//! └───────────────────┬──────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼──────────────────────────────────────┐
//! │  Repository Layer (db/)                                   │
//! │  - LocalRepository / FileRepository                       │
//! └──────────────────────────────────────────────────────────┘
//! ```

pub mod dto;
pub mod error;
pub mod handlers;
pub mod router;
pub mod state;

pub use router::create_router;
pub use state::AppState;
