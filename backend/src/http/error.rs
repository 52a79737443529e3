//! HTTP error handling and response types.

use axum::{
    extract::{rejection::JsonRejection, FromRequest, Request},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::db::repository::RepositoryError;
use crate::services::{AllocationError, RegistryError};

/// API error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Optional additional details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ApiError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }
}

/// Application error type for HTTP handlers.
#[derive(Debug)]
pub enum AppError {
    /// Request body could not be read as the expected JSON shape
    Payload(JsonRejection),
    /// Peak window registration failed
    Registry(RegistryError),
    /// Allocation rejected
    Allocation(AllocationError),
}

impl AppError {
    fn repository_response(e: RepositoryError) -> (StatusCode, ApiError) {
        let status = if e.is_retryable() {
            StatusCode::SERVICE_UNAVAILABLE
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };
        (status, ApiError::new("REPOSITORY_ERROR", e.to_string()))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error) = match self {
            AppError::Payload(rejection) => {
                let status = rejection.status();
                let code = if status == StatusCode::UNPROCESSABLE_ENTITY {
                    "INVALID_REQUEST"
                } else {
                    "BAD_REQUEST"
                };
                (status, ApiError::new(code, rejection.body_text()))
            }
            AppError::Registry(RegistryError::MalformedInterval {
                signal_id,
                raw,
                reason,
            }) => {
                let message = format!(
                    "Malformed peak interval '{}' for signal {}: {}",
                    raw, signal_id, reason
                );
                (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    ApiError::new("MALFORMED_INTERVAL", message).with_details(
                        serde_json::json!({ "signal_id": signal_id, "raw": raw }),
                    ),
                )
            }
            AppError::Registry(RegistryError::Repository(e)) => Self::repository_response(e),
            AppError::Allocation(e) => {
                let details = match &e {
                    AllocationError::InvalidRate { signal_id, rate } => {
                        Some(serde_json::json!({ "signal_id": signal_id, "rate": rate }))
                    }
                    AllocationError::DuplicateSignal(signal_id)
                    | AllocationError::InvalidDemand { signal_id, .. } => {
                        Some(serde_json::json!({ "signal_id": signal_id }))
                    }
                    _ => None,
                };
                let code = match e {
                    AllocationError::InvalidRate { .. } => "INVALID_RATE",
                    AllocationError::ZeroDemand { .. } => "ZERO_DEMAND",
                    AllocationError::InvalidDemand { .. } => "INVALID_DEMAND",
                    _ => "INVALID_REQUEST",
                };
                let mut error = ApiError::new(code, e.to_string());
                if let Some(details) = details {
                    error = error.with_details(details);
                }
                (StatusCode::UNPROCESSABLE_ENTITY, error)
            }
        };

        (status, Json(error)).into_response()
    }
}

impl From<RegistryError> for AppError {
    fn from(err: RegistryError) -> Self {
        AppError::Registry(err)
    }
}

impl From<AllocationError> for AppError {
    fn from(err: AllocationError) -> Self {
        AppError::Allocation(err)
    }
}

impl From<RepositoryError> for AppError {
    fn from(err: RepositoryError) -> Self {
        AppError::Registry(RegistryError::Repository(err))
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Payload(rejection)
    }
}

/// `Json` extractor whose rejections are reported as [`ApiError`] bodies.
pub struct ApiJson<T>(pub T);

impl<S, T> FromRequest<S> for ApiJson<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        Ok(ApiJson(value))
    }
}
