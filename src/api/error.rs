// API error taxonomy
// Every failure a handler can produce, bound to exactly one status code

use hyper::StatusCode;
use serde_json::error::Category;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    /// Missing or malformed input (query parameter, required field)
    #[error("{0}")]
    Validation(String),
    /// Body is not syntactically valid JSON
    #[error("Invalid JSON: {0}")]
    InvalidJson(String),
    /// Body is JSON but has the wrong shape (unknown field, wrong type)
    #[error("Invalid request body: {0}")]
    InvalidBody(String),
    #[error("{0} not found")]
    NotFound(String),
    #[error("Method {0} not allowed")]
    MethodNotAllowed(String),
    #[error("Request body too large (max {0} bytes)")]
    PayloadTooLarge(u64),
    #[error("Failed to read request body")]
    BodyRead,
    /// Detail is logged, never sent to the client
    #[error("Internal server error")]
    Internal(String),
}

impl ApiError {
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::InvalidJson(_) | Self::InvalidBody(_) | Self::BodyRead => {
                StatusCode::BAD_REQUEST
            }
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::MethodNotAllowed(_) => StatusCode::METHOD_NOT_ALLOWED,
            Self::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn missing_fields(fields: &[&str]) -> Self {
        Self::Validation(format!("Missing required fields: {}", fields.join(", ")))
    }

    pub fn missing_id(label: &str) -> Self {
        Self::Validation(format!("{label} ID is required"))
    }

    pub fn invalid_param(name: &str, raw: &str) -> Self {
        Self::Validation(format!("Invalid value for '{name}': '{raw}'"))
    }

    pub fn blank_fields(fields: &[&str]) -> Self {
        Self::Validation(format!("Fields must not be blank: {}", fields.join(", ")))
    }

    pub fn not_found(label: &str, id: i64) -> Self {
        Self::NotFound(format!("{label} with id {id}"))
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        match err.classify() {
            Category::Data => Self::InvalidBody(err.to_string()),
            Category::Syntax | Category::Eof => Self::InvalidJson(err.to_string()),
            Category::Io => Self::BodyRead,
        }
    }
}
