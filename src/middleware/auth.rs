// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Bearer token extraction.
//!
//! The check here is purely syntactic: the token is not validated against
//! Strava. An invalid or expired token is only discovered when the
//! forwarded upstream call answers 401, which the route layer handles with
//! its single refresh-and-retry sequence.

use crate::error::AppError;
use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};

/// Bearer access token taken from the `Authorization` header.
#[derive(Debug, Clone)]
pub struct Bearer {
    pub token: String,
}

impl<S> FromRequestParts<S> for Bearer
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok());

        let token = match header {
            Some(h) if h.starts_with("Bearer ") => h[7..].trim(),
            _ => return Err(AppError::Unauthorized),
        };

        if token.is_empty() {
            return Err(AppError::Unauthorized);
        }

        Ok(Bearer {
            token: token.to_string(),
        })
    }
}
