// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application error types with consistent API responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Application error type that converts to HTTP responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Authentication required")]
    Unauthorized,

    #[error("Missing authorization code")]
    MissingAuthCode,

    #[error("Strava rejected the credentials: {0}")]
    UpstreamAuth(String),

    #[error("Strava unavailable: {0}")]
    UpstreamUnavailable(String),

    #[error("Invalid request: {0}")]
    BadRequest(String),
}

impl From<axum::extract::rejection::QueryRejection> for AppError {
    fn from(rejection: axum::extract::rejection::QueryRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl AppError {
    /// Whether this error means the upstream refused the access token, i.e.
    /// the bearer token is expired or revoked and a refresh may help.
    pub fn is_expired_token(&self) -> bool {
        matches!(self, AppError::UpstreamAuth(_))
    }
}

/// JSON error response body
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error, details) = match &self {
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, "unauthorized", None),
            AppError::MissingAuthCode => (
                StatusCode::BAD_REQUEST,
                "missing_code",
                Some("Missing code".to_string()),
            ),
            AppError::UpstreamAuth(msg) => {
                (StatusCode::UNAUTHORIZED, "upstream_auth", Some(msg.clone()))
            }
            AppError::UpstreamUnavailable(msg) => {
                tracing::error!(error = %msg, "Strava unavailable");
                (StatusCode::BAD_GATEWAY, "upstream_unavailable", None)
            }
            AppError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, "bad_request", Some(msg.clone()))
            }
        };

        let body = ErrorResponse {
            error: error.to_string(),
            details,
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for handlers
pub type Result<T> = std::result::Result<T, AppError>;
