//! HTTP handlers for the REST API.
//!
//! Each handler corresponds to an API endpoint and delegates to
//! [`CycleService`](crate::services::CycleService).

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use super::dto::{
    AllocateRequest, AllocateResponse, HealthResponse, PeakHoursListResponse, PeakWindowEntry,
    RegisterResponse, SignalId,
};
use super::error::{ApiJson, AppError};
use super::state::AppState;
use crate::db::services as db_services;

/// Result type for handlers.
pub type HandlerResult<T> = Result<Json<T>, AppError>;

// =============================================================================
// Health Check
// =============================================================================

/// GET /health
///
/// Verify the service is running and the peak window store is reachable.
pub async fn health_check(State(state): State<AppState>) -> HandlerResult<HealthResponse> {
    let store = state.service.registry().store();
    let store_status = match db_services::health_check(store.as_ref()).await {
        Ok(true) => format!("{}: ok", store.backend_name()),
        Ok(false) => format!("{}: unavailable", store.backend_name()),
        Err(e) => format!("{}: error: {}", store.backend_name(), e),
    };

    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        version: "v1".to_string(),
        store: store_status,
    }))
}

/// GET /openapi.json
///
/// Minimal OpenAPI 3 description of the routes below.
pub async fn openapi_spec() -> Json<serde_json::Value> {
    let error = serde_json::json!({ "$ref": "#/components/schemas/ApiError" });
    Json(serde_json::json!({
        "openapi": "3.0.3",
        "info": {
            "title": "Signal Cycle API",
            "version": env!("CARGO_PKG_VERSION"),
            "description": "Green-time allocation for traffic signals sharing one cycle",
        },
        "paths": {
            "/health": { "get": { "summary": "Service and store status" } },
            "/v1/peak-hours": {
                "get": { "summary": "List registered peak windows" },
                "put": {
                    "summary": "Replace all peak windows",
                    "responses": { "422": { "content": { "application/json": { "schema": error } } } },
                },
            },
            "/v1/peak-hours/{signal_id}": {
                "get": { "summary": "Peak windows of one signal" },
            },
            "/v1/cycles/allocate": {
                "post": {
                    "summary": "Split a cycle across signals",
                    "responses": { "422": { "content": { "application/json": { "schema": error } } } },
                },
            },
        },
        "components": {
            "schemas": {
                "ApiError": {
                    "type": "object",
                    "required": ["code", "message"],
                    "properties": {
                        "code": { "type": "string" },
                        "message": { "type": "string" },
                        "details": { "type": "object" },
                    },
                },
            },
        },
    }))
}

// =============================================================================
// Peak Hours
// =============================================================================

/// PUT /v1/peak-hours
///
/// Replace every registered peak window with the request body.
pub async fn register_peak_hours(
    State(state): State<AppState>,
    ApiJson(entries): ApiJson<Vec<PeakWindowEntry>>,
) -> HandlerResult<RegisterResponse> {
    let registered = state.service.register_peak_hours(&entries).await?;

    Ok(Json(RegisterResponse {
        registered,
        message: format!("Peak hours registered for {} signals", registered),
    }))
}

/// GET /v1/peak-hours
pub async fn list_peak_hours(State(state): State<AppState>) -> HandlerResult<PeakHoursListResponse> {
    let entries = state.service.registry().entries();
    let total = entries.len();
    Ok(Json(PeakHoursListResponse { entries, total }))
}

/// GET /v1/peak-hours/{signal_id}
///
/// Unknown signals answer with an empty list rather than 404.
pub async fn get_peak_hours(
    State(state): State<AppState>,
    Path(signal_id): Path<i64>,
) -> HandlerResult<PeakWindowEntry> {
    let signal_id = SignalId::new(signal_id);
    let intervals = state.service.registry().lookup(signal_id);

    Ok(Json(PeakWindowEntry {
        signal_id,
        peak_hours: intervals.iter().map(ToString::to_string).collect(),
    }))
}

// =============================================================================
// Allocation
// =============================================================================

/// POST /v1/cycles/allocate
///
/// Split `total_cycle_time` across the submitted signals.
pub async fn allocate_cycle(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<AllocateRequest>,
) -> Result<(StatusCode, Json<AllocateResponse>), AppError> {
    let (request, current_time) = request.into_parts();
    let outcome = state.service.allocate_cycle(&request, current_time)?;

    Ok((
        StatusCode::OK,
        Json(AllocateResponse {
            current_time: outcome.current_time,
            total_cycle_time: request.total_cycle_time,
            allocations: outcome.result.allocations,
        }),
    ))
}
