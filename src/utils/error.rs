//! Error handling module
//!
//! Defines the error taxonomy shared by the server and the command line tool

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use crate::providers::ProviderError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    /// Bad or missing input
    #[error("{0}")]
    Validation(String),

    /// No usable provider credential
    #[error("Configuration error: {0}")]
    Config(String),

    /// Daily quota exhausted for the caller
    #[error("Rate limit exceeded")]
    RateLimit {
        /// Daily limit that was hit
        limit: u32,
    },

    /// Vendor call failed or returned an unparseable payload
    #[error("{0}")]
    Upstream(String),

    /// Local shell execution failed
    #[error("Command execution failed: {0}")]
    Execution(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error response body
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Short error description
    pub error: String,
    /// Human readable detail (optional)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Error class
    #[serde(rename = "type")]
    pub error_type: String,
}

impl AppError {
    /// Get HTTP status code
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::RateLimit { .. } => StatusCode::TOO_MANY_REQUESTS,
            AppError::Config(_)
            | AppError::Upstream(_)
            | AppError::Execution(_)
            | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get error type string
    pub fn error_type(&self) -> &'static str {
        match self {
            AppError::Validation(_) => "invalid_request_error",
            AppError::Config(_) => "configuration_error",
            AppError::RateLimit { .. } => "rate_limit_error",
            AppError::Upstream(_) => "upstream_error",
            AppError::Execution(_) => "execution_error",
            AppError::Internal(_) => "api_error",
        }
    }

    /// Detail line shown next to the short error
    pub fn detail(&self) -> Option<String> {
        match self {
            AppError::RateLimit { limit } => Some(format!(
                "Daily limit of {} requests reached. Try again tomorrow.",
                limit
            )),
            _ => None,
        }
    }

    /// Whether the user should be pointed at the configuration helper
    pub fn suggests_config(&self) -> bool {
        matches!(self, AppError::Config(_) | AppError::Upstream(_))
    }

    /// Whether detailed error information should be logged
    pub fn should_log_details(&self) -> bool {
        !matches!(self, AppError::Validation(_) | AppError::RateLimit { .. })
    }

    /// Convert to the JSON error body
    pub fn to_error_response(&self) -> ErrorResponse {
        ErrorResponse {
            error: self.to_string(),
            message: self.detail(),
            error_type: self.error_type().to_string(),
        }
    }
}

/// Implement IntoResponse trait to allow errors to be returned directly as HTTP responses
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if self.should_log_details() {
            tracing::error!("Application error: {} - Status code: {}", self, status);
        } else {
            tracing::warn!("Client error: {} - Status code: {}", self.error_type(), status);
        }

        (status, Json(self.to_error_response())).into_response()
    }
}

impl From<ProviderError> for AppError {
    fn from(err: ProviderError) -> Self {
        AppError::Upstream(err.to_string())
    }
}

/// Result type alias
pub type AppResult<T> = Result<T, AppError>;
