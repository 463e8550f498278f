//! Unified error handling for HTTP handlers.
//!
//! Every handler returns `Result<T, AppError>`. Server-side failures are
//! logged before responding and their details are hidden from clients;
//! rule violations are reported back verbatim.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::cart::CartError;
use crate::customer::CustomerError;
use crate::sdk::SdkError;

/// Application-level error type.
#[derive(Debug, Error)]
pub enum AppError {
    /// Backend data service failed.
    #[error("Backend error: {0}")]
    Sdk(#[from] SdkError),

    /// Cart rule violation or cart storage failure.
    #[error("{0}")]
    Cart(#[from] CartError),

    /// Customer account rule violation.
    #[error("{0}")]
    Customer(#[from] CustomerError),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Malformed request.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Well-formed request that breaks a business rule.
    #[error("{0}")]
    Unprocessable(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            Self::Sdk(err) | Self::Customer(CustomerError::Sdk(err)) => match err {
                SdkError::NotFound { .. } => StatusCode::NOT_FOUND,
                _ => StatusCode::BAD_GATEWAY,
            },
            Self::Cart(err) if err.is_storage() => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Cart(CartError::LineNotFound(_)) => StatusCode::NOT_FOUND,
            Self::Cart(CartError::InvalidKey(_)) => StatusCode::BAD_REQUEST,
            Self::Customer(
                CustomerError::RestaurantNotFound(_) | CustomerError::OrderNotFound(_),
            ) => StatusCode::NOT_FOUND,
            Self::Cart(_) | Self::Customer(_) | Self::Unprocessable(_) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Don't expose internal error details to clients
        let message = if status.is_server_error() {
            tracing::error!(error = %self, status = %status, "Request failed");
            match status {
                StatusCode::BAD_GATEWAY => "External service error".to_string(),
                _ => "Internal server error".to_string(),
            }
        } else {
            self.to_string()
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;
