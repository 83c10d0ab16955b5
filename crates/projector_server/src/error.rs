//! API error handling
//!
//! Every failure leaves the server as a JSON body of the form
//! `{"error": <code>, "message": <text>, "details": [{"field", "reason"}...]}`.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use projector_core::{FieldViolation, ParameterError};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors returned by the API handlers
#[derive(Debug, Error)]
pub enum ApiError {
    /// One or more simulation parameters are missing or out of range
    #[error(transparent)]
    InvalidParameters(#[from] ParameterError),

    /// The request body is not valid JSON for the endpoint
    #[error("Malformed request body: {0}")]
    MalformedRequest(String),

    /// The engine did not complete; indicates a defect, not bad input
    #[error("Simulation failed: {0}")]
    SimulationFailed(String),
}

/// JSON error body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Machine-readable error code
    pub error: String,
    /// Human-readable description
    pub message: String,
    /// Per-field violations, empty unless the input was rejected
    pub details: Vec<FieldViolation>,
}

impl ApiError {
    /// HTTP status for this error
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidParameters(_) | ApiError::MalformedRequest(_) => {
                StatusCode::BAD_REQUEST
            }
            ApiError::SimulationFailed(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Machine-readable error code
    pub fn code(&self) -> &'static str {
        match self {
            ApiError::InvalidParameters(_) => "invalid_parameters",
            ApiError::MalformedRequest(_) => "malformed_request",
            ApiError::SimulationFailed(_) => "internal_error",
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::MalformedRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        let (message, details) = match &self {
            ApiError::InvalidParameters(err) => (err.to_string(), err.violations().to_vec()),
            ApiError::MalformedRequest(_) => (self.to_string(), Vec::new()),
            ApiError::SimulationFailed(reason) => {
                tracing::error!(reason = %reason, "Simulation failed");
                ("Internal server error".to_string(), Vec::new())
            }
        };

        let body = ErrorResponse {
            error: self.code().to_string(),
            message,
            details,
        };

        (status, Json(body)).into_response()
    }
}

/// Helper type for API results
pub type ApiResult<T> = Result<T, ApiError>;
