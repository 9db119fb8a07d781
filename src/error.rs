use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Failures of the thermal engine. Any of these aborts the whole run.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimulationError {
    #[error("invalid parameter `{name}`: {value} (must be > 0)")]
    InvalidParameter { name: &'static str, value: f64 },

    #[error("start step {start_step} is past the end of a {duration}-step run")]
    InvalidTimeline { start_step: u32, duration: u32 },
}

/// Fails with `InvalidParameter` unless `value` is strictly positive.
pub(crate) fn require_positive(name: &'static str, value: f64) -> Result<f64, SimulationError> {
    if value > 0.0 {
        Ok(value)
    } else {
        Err(SimulationError::InvalidParameter { name, value })
    }
}

/// Errors returned from HTTP handlers.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error(transparent)]
    Simulation(#[from] SimulationError),

    #[error("Internal server error: {0}")]
    Internal(String),
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: &'static str,
    message: String,
}

impl ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) | ApiError::Simulation(_) => StatusCode::BAD_REQUEST,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_type(&self) -> &'static str {
        match self {
            ApiError::BadRequest(_) => "BadRequest",
            ApiError::Simulation(SimulationError::InvalidParameter { .. }) => "InvalidParameter",
            ApiError::Simulation(SimulationError::InvalidTimeline { .. }) => "InvalidTimeline",
            ApiError::Internal(_) => "InternalServerError",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let message = match &self {
            ApiError::Internal(_) => {
                tracing::error!(error = %self, "request failed");
                "An internal error occurred".to_string()
            }
            _ => {
                tracing::debug!(error = %self, "client error");
                self.to_string()
            }
        };

        let body = ErrorResponse { error: self.error_type(), message };
        (self.status_code(), Json(body)).into_response()
    }
}
