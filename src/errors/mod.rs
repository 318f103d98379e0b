//! Error handling module for the branch site backend.
//!
//! Provides centralized error types with mapping to HTTP status codes and response envelopes.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

/// Error codes as constants to avoid stringly-typed errors.
pub mod codes {
    pub const NOT_FOUND: &str = "NOT_FOUND";
    pub const VALIDATION_ERROR: &str = "VALIDATION_ERROR";
    pub const INTERNAL_ERROR: &str = "INTERNAL_ERROR";
    pub const DATABASE_ERROR: &str = "DATABASE_ERROR";
    pub const BAD_REQUEST: &str = "BAD_REQUEST";
}

/// Message returned for every 5xx; the real cause only goes to the log.
pub const GENERIC_FAILURE: &str = "Something went wrong. Please try again later.";

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    /// Resource not found
    NotFound(String),
    /// Required fields missing or out of range
    Validation {
        message: String,
        missing_fields: Vec<String>,
        invalid_fields: Vec<String>,
    },
    /// Database error
    Database(String),
    /// Internal server error
    Internal(String),
    /// Malformed request body
    BadRequest(String),
}

impl AppError {
    /// Build a validation error from the offending field names.
    pub fn validation(missing_fields: Vec<String>, invalid_fields: Vec<String>) -> Self {
        let mut parts = Vec::new();
        if !missing_fields.is_empty() {
            parts.push(format!("Missing required fields: {}", missing_fields.join(", ")));
        }
        if !invalid_fields.is_empty() {
            parts.push(format!("Invalid fields: {}", invalid_fields.join(", ")));
        }
        AppError::Validation {
            message: parts.join("; "),
            missing_fields,
            invalid_fields,
        }
    }

    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Validation { .. } => StatusCode::BAD_REQUEST,
            AppError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }

    /// Get the error code for this error.
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::NotFound(_) => codes::NOT_FOUND,
            AppError::Validation { .. } => codes::VALIDATION_ERROR,
            AppError::Database(_) => codes::DATABASE_ERROR,
            AppError::Internal(_) => codes::INTERNAL_ERROR,
            AppError::BadRequest(_) => codes::BAD_REQUEST,
        }
    }

    /// Get the error message.
    pub fn message(&self) -> String {
        match self {
            AppError::NotFound(msg) => msg.clone(),
            AppError::Validation { message, .. } => message.clone(),
            AppError::Database(msg) => msg.clone(),
            AppError::Internal(msg) => msg.clone(),
            AppError::BadRequest(msg) => msg.clone(),
        }
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.error_code(), self.message())
    }
}

impl std::error::Error for AppError {}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        tracing::error!("Database error: {:?}", err);
        AppError::Database(format!("Database error: {}", err))
    }
}

/// Error details in the response envelope.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorDetails {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

/// Error response envelope.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: ErrorDetails,
}

impl ErrorResponse {
    pub fn new(error: &AppError) -> Self {
        let details = match error {
            AppError::Validation {
                missing_fields,
                invalid_fields,
                ..
            } => {
                let mut details = serde_json::Map::new();
                if !missing_fields.is_empty() {
                    details.insert("missingFields".to_string(), serde_json::json!(missing_fields));
                }
                if !invalid_fields.is_empty() {
                    details.insert("invalidFields".to_string(), serde_json::json!(invalid_fields));
                }
                Some(serde_json::Value::Object(details))
            }
            _ => None,
        };

        // Server-side failures never echo their cause to the caller.
        let message = if error.status_code().is_server_error() {
            GENERIC_FAILURE.to_string()
        } else {
            error.message()
        };

        Self {
            success: false,
            error: ErrorDetails {
                code: error.error_code().to_string(),
                message,
                details,
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!("Request failed: {}", self);
        }
        let body = ErrorResponse::new(&self);
        (status, Json(body)).into_response()
    }
}
