//! # API Error Types
//!
//! Structured error type implementing `axum::response::IntoResponse`.
//! Maps core validation errors, collaborator failures and consent-token
//! failures to HTTP status codes. Internal and upstream details are
//! logged, never returned.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use payee_consent_client::ClientError;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

use crate::token::TokenError;

/// Body returned for an unusable consent token or custom attribute payload.
pub const MALFORMED_INPUT: &str = "Malformed input";

/// Structured JSON error response body.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

/// Inner error detail.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorDetail {
    /// Machine-readable error code (e.g., "UNAUTHORIZED", "VALIDATION_ERROR").
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Additional details, present only for client errors.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

/// Application-level error type that implements [`IntoResponse`] for Axum.
#[derive(Error, Debug)]
pub enum AppError {
    /// Request validation failed (422).
    #[error("validation error: {0}")]
    Validation(String),

    /// Request body could not be parsed (422).
    #[error("bad request: {0}")]
    BadRequest(String),

    /// Consent token or query payload unusable (400, plain text).
    #[error("malformed input: {0}")]
    MalformedInput(String),

    /// Missing or inactive credential (401).
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Internal server error (500). Message is logged but not returned to client.
    #[error("internal error: {0}")]
    Internal(String),

    /// A collaborator failed or answered with something unusable (502).
    #[error("upstream error: {0}")]
    UpstreamError(String),
}

impl AppError {
    /// Return the HTTP status code and machine-readable error code for this error.
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            Self::Validation(_) => (StatusCode::UNPROCESSABLE_ENTITY, "VALIDATION_ERROR"),
            Self::BadRequest(_) => (StatusCode::UNPROCESSABLE_ENTITY, "BAD_REQUEST"),
            Self::MalformedInput(_) => (StatusCode::BAD_REQUEST, "MALFORMED_INPUT"),
            Self::Unauthorized(_) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
            Self::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
            Self::UpstreamError(_) => (StatusCode::BAD_GATEWAY, "UPSTREAM_ERROR"),
        }
    }

    /// Construct an upstream error (502 Bad Gateway).
    pub fn upstream(msg: String) -> Self {
        Self::UpstreamError(msg)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        match &self {
            Self::Internal(_) => tracing::error!(error = %self, "internal server error"),
            Self::UpstreamError(_) => tracing::error!(error = %self, "upstream service error"),
            Self::MalformedInput(_) => tracing::warn!(error = %self, "rejected consent prompt input"),
            _ => {}
        }

        // The consent prompt is browser-facing; it answers with bare text.
        if let Self::MalformedInput(_) = &self {
            return (status, MALFORMED_INPUT).into_response();
        }

        // Never expose internal/upstream error messages to clients.
        let message = match &self {
            Self::Internal(_) => "An internal error occurred".to_string(),
            Self::UpstreamError(_) => "An upstream service error occurred".to_string(),
            other => other.to_string(),
        };

        let body = ErrorBody {
            error: ErrorDetail {
                code: code.to_string(),
                message,
                details: None,
            },
        };

        (status, Json(body)).into_response()
    }
}

impl From<payee_consent_core::ValidationError> for AppError {
    fn from(err: payee_consent_core::ValidationError) -> Self {
        Self::Validation(err.to_string())
    }
}

impl From<ClientError> for AppError {
    fn from(err: ClientError) -> Self {
        Self::upstream(err.to_string())
    }
}

/// Signing failures are ours; verification failures are the caller's.
impl From<TokenError> for AppError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Invalid(_) => Self::MalformedInput(err.to_string()),
            TokenError::Encode(_) | TokenError::WeakSecret { .. } | TokenError::InvalidTtl(_) => {
                Self::Internal(err.to_string())
            }
        }
    }
}
