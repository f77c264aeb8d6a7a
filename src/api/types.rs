//! API request and response types.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::error::SessionError;

/// Query parameters for the login endpoint.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct LoginQuery {
    /// User name to store in the session.
    #[serde(default)]
    pub name: Option<String>,
}

impl LoginQuery {
    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or("foo")
    }
}

/// Generic API error response.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Error code (e.g., "STORE_ERROR").
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Additional details (optional).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ErrorResponse {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn from_error(err: &SessionError) -> Self {
        Self::new(err.code(), err.to_string())
    }
}

impl IntoResponse for SessionError {
    fn into_response(self) -> Response {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse::from_error(&self)),
        )
            .into_response()
    }
}
