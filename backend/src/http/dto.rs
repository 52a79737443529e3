//! Data Transfer Objects for the HTTP API.
//!
//! Request payloads reuse the model types where the wire shape matches;
//! responses wrap them with the context a client needs.

use serde::{Deserialize, Serialize};

pub use crate::models::{
    CycleRequest, PeakWindowEntry, SignalAllocation, SignalId, SignalObservation, TimeOfDay,
};

/// Body of `POST /v1/cycles/allocate`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AllocateRequest {
    /// Seconds of green time to distribute
    pub total_cycle_time: f64,
    pub signals: Vec<SignalObservation>,
    /// Evaluate peak windows at this time instead of the server clock
    #[serde(default)]
    pub current_time: Option<TimeOfDay>,
}

impl AllocateRequest {
    pub fn into_parts(self) -> (CycleRequest, Option<TimeOfDay>) {
        (
            CycleRequest::new(self.total_cycle_time, self.signals),
            self.current_time,
        )
    }
}

/// Response of `POST /v1/cycles/allocate`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AllocateResponse {
    /// Time used for peak matching
    pub current_time: TimeOfDay,
    pub total_cycle_time: f64,
    pub allocations: Vec<SignalAllocation>,
}

/// Response of `PUT /v1/peak-hours`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterResponse {
    /// Number of signals now holding peak windows
    pub registered: usize,
    pub message: String,
}

/// Response of `GET /v1/peak-hours`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PeakHoursListResponse {
    pub entries: Vec<PeakWindowEntry>,
    pub total: usize,
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Status of the service
    pub status: String,
    /// Version of the API
    pub version: String,
    /// Status of the peak window store
    pub store: String,
}
