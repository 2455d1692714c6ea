//! API error boundary.
//!
//! Upstream outcomes are not errors here; they ride in the normal response
//! envelope. This type covers what goes wrong before the relay call
//! (validation, unusable query strings) and anything unexpected during
//! handling. Every branch renders well-formed JSON; no failure path returns
//! an empty body or raw panic text.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::Utc;
use flipkart_client::ValidationError;
use serde::Serialize;
use thiserror::Error;
use tracing::error;

use crate::api::SPAM_USAGE;

/// Errors surfaced directly by the inbound API.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    InvalidNumber(#[from] ValidationError),

    #[error("Malformed query string: {0}")]
    InvalidQuery(String),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub success: bool,
    pub error: String,
    pub message: String,
    pub code: String,
    pub timestamp: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provided: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage: Option<String>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let timestamp = Utc::now().to_rfc3339();

        let (status, body) = match &self {
            ApiError::InvalidNumber(e) => {
                let error = match e {
                    ValidationError::Missing => "Phone number is required",
                    _ => "Invalid phone number",
                };
                (
                    StatusCode::BAD_REQUEST,
                    ErrorBody {
                        success: false,
                        error: error.to_string(),
                        message: e.to_string(),
                        code: e.code().to_string(),
                        timestamp,
                        provided: e.provided().map(str::to_string),
                        usage: matches!(e, ValidationError::Missing)
                            .then(|| SPAM_USAGE.to_string()),
                    },
                )
            }
            ApiError::InvalidQuery(detail) => (
                StatusCode::BAD_REQUEST,
                ErrorBody {
                    success: false,
                    error: "Malformed query string".to_string(),
                    message: detail.clone(),
                    code: "INVALID_QUERY".to_string(),
                    timestamp,
                    provided: None,
                    usage: Some(SPAM_USAGE.to_string()),
                },
            ),
            ApiError::Internal(e) => {
                // Detail stays in the logs; the caller gets a generic body.
                error!("Unhandled error: {:#}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorBody {
                        success: false,
                        error: "Internal server error".to_string(),
                        message: "An unexpected error occurred".to_string(),
                        code: "INTERNAL_ERROR".to_string(),
                        timestamp,
                        provided: None,
                        usage: None,
                    },
                )
            }
        };

        (status, Json(body)).into_response()
    }
}
