// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Token grant response from the Strava OAuth token endpoint.

use chrono::{DateTime, Utc};
use serde::Deserialize;

/// Access/refresh token pair produced by a grant call.
///
/// Never persisted server-side: the access token goes straight to the
/// browser and the refresh token lives only in the HTTP-only cookie.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    /// Access token expiry (Strava sends epoch seconds).
    #[serde(with = "chrono::serde::ts_seconds")]
    pub expires_at: DateTime<Utc>,
}
