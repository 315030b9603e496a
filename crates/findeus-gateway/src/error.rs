// SPDX-FileCopyrightText: 2026 FinDeus Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mapping from internal errors to sanitized HTTP responses.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use findeus_core::FinDeusError;
use findeus_security::redact;

const INTERNAL_MESSAGE: &str = "internal server error";
const MARKET_MESSAGE: &str = "market data unavailable";

/// Error response body.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error description.
    pub error: String,
}

/// An error ready to be sent to the client.
///
/// Only validation messages are passed through verbatim; every other error
/// is logged server-side and replaced by a fixed message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    BadRequest(String),
    NotFound,
    Internal(&'static str),
}

impl ApiError {
    /// Converts `err`, logging the full text with `known_secrets` redacted.
    pub fn from_core(err: FinDeusError, known_secrets: &[String]) -> Self {
        match err {
            FinDeusError::Validation(message) => Self::BadRequest(message),
            FinDeusError::MarketData { .. } | FinDeusError::Timeout { .. } => {
                error!(error = %redact(&err.to_string(), known_secrets), "market data request failed");
                Self::Internal(MARKET_MESSAGE)
            }
            other => {
                error!(error = %redact(&other.to_string(), known_secrets), "request failed");
                Self::Internal(INTERNAL_MESSAGE)
            }
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Self::BadRequest(message) => message,
            Self::NotFound => "endpoint not found",
            Self::Internal(message) => message,
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        // The rejection text can echo parser internals; keep it in the logs.
        debug!(error = %rejection.body_text(), "rejected request body");
        let message = match rejection {
            JsonRejection::MissingJsonContentType(_) => "expected a JSON request body",
            _ => "invalid JSON body",
        };
        Self::BadRequest(message.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorResponse {
            error: self.message().to_string(),
        };
        (self.status(), Json(body)).into_response()
    }
}
