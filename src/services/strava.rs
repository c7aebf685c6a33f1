// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Strava API client: OAuth grants and resource calls.
//!
//! Handles:
//! - The authorize redirect URL
//! - Authorization-code and refresh-token grants
//! - Athlete profile and activity list fetches
//! - Classification of upstream failures (auth vs. unavailable)
//!
//! The client is stateless and cloneable. Token lifecycle decisions
//! (when to refresh, what to do with the rotated refresh token) live in
//! the route layer; this module only translates grants.

use crate::error::AppError;
use crate::models::{ActivitySummary, Athlete, TokenPair};
use serde::Deserialize;
use std::time::Duration;

/// OAuth scope requested at login: profile plus activity listing.
const OAUTH_SCOPE: &str = "read,activity:read";

/// Per-call timeout so a slow upstream cannot stall a handler.
const UPSTREAM_TIMEOUT: Duration = Duration::from_secs(10);

/// Strava API client.
#[derive(Clone)]
pub struct StravaClient {
    http: reqwest::Client,
    base_url: String,
    client_id: String,
    client_secret: String,
}

impl StravaClient {
    /// Create a new Strava client with OAuth credentials.
    pub fn new(client_id: String, client_secret: String) -> Self {
        Self::with_base_url(client_id, client_secret, "https://www.strava.com".to_string())
    }

    /// Create a client against a non-default upstream (used by tests).
    ///
    /// Panics if the TLS backend cannot be initialized, same as
    /// `reqwest::Client::new`.
    pub fn with_base_url(client_id: String, client_secret: String, base_url: String) -> Self {
        Self {
            http: reqwest::Client::builder()
                .timeout(UPSTREAM_TIMEOUT)
                .build()
                .expect("failed to build HTTP client"),
            base_url,
            client_id,
            client_secret,
        }
    }

    // ─── OAuth Grants ────────────────────────────────────────────────────────

    /// Build the Strava authorize URL for the login redirect.
    ///
    /// Pure function of the credentials: identical inputs always yield an
    /// identical URL string.
    pub fn authorize_url(&self, redirect_uri: &str) -> String {
        format!(
            "{}/oauth/authorize?client_id={}&redirect_uri={}&response_type=code&scope={}&approval_prompt=auto",
            self.base_url,
            urlencoding::encode(&self.client_id),
            urlencoding::encode(redirect_uri),
            urlencoding::encode(OAUTH_SCOPE),
        )
    }

    /// Exchange an authorization code for a token pair.
    ///
    /// Authorization codes are single-use by upstream contract, so this
    /// call is never retried, not even on transport failure.
    pub async fn exchange_code(&self, code: &str) -> Result<TokenPair, AppError> {
        let response = self
            .http
            .post(format!("{}/oauth/token", self.base_url))
            .form(&[
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
                ("code", code),
                ("grant_type", "authorization_code"),
            ])
            .send()
            .await
            .map_err(transport_error)?;

        check_grant_response(response, "token exchange").await
    }

    /// Refresh an expired access token.
    ///
    /// A successful refresh invalidates the previous refresh token at
    /// Strava, so the caller must overwrite the stored cookie with the new
    /// value immediately and must not retry after a successful response.
    pub async fn refresh_token(&self, refresh_token: &str) -> Result<TokenPair, AppError> {
        let response = self
            .http
            .post(format!("{}/oauth/token", self.base_url))
            .form(&[
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
                ("refresh_token", refresh_token),
                ("grant_type", "refresh_token"),
            ])
            .send()
            .await
            .map_err(transport_error)?;

        check_grant_response(response, "token refresh").await
    }

    // ─── Resource Calls ──────────────────────────────────────────────────────

    /// Get the authenticated athlete's profile.
    pub async fn get_athlete(&self, access_token: &str) -> Result<Athlete, AppError> {
        let url = format!("{}/api/v3/athlete", self.base_url);
        self.get_json(&url, access_token, &[]).await
    }

    /// List the authenticated athlete's activities (upstream pagination).
    pub async fn list_activities(
        &self,
        access_token: &str,
        page: u32,
        per_page: u32,
    ) -> Result<Vec<ActivitySummary>, AppError> {
        let url = format!("{}/api/v3/athlete/activities", self.base_url);
        self.get_json(
            &url,
            access_token,
            &[("page", page.to_string()), ("per_page", per_page.to_string())],
        )
        .await
    }

    /// Generic GET request with bearer auth and JSON response.
    async fn get_json<T: for<'de> Deserialize<'de>>(
        &self,
        url: &str,
        access_token: &str,
        query: &[(&str, String)],
    ) -> Result<T, AppError> {
        let response = self
            .http
            .get(url)
            .bearer_auth(access_token)
            .query(query)
            .send()
            .await
            .map_err(transport_error)?;

        check_resource_response(response).await
    }
}

/// Map a reqwest transport failure (connect, timeout, protocol).
fn transport_error(err: reqwest::Error) -> AppError {
    AppError::UpstreamUnavailable(err.to_string())
}

/// Check a token-endpoint response and parse the token pair.
///
/// Any 4xx means the grant itself was rejected (expired code, already-used
/// code, revoked refresh token); 5xx means Strava is having a bad day.
async fn check_grant_response(
    response: reqwest::Response,
    context: &str,
) -> Result<TokenPair, AppError> {
    let status = response.status();
    if status.is_client_error() {
        let body = response.text().await.unwrap_or_default();
        tracing::warn!(status = %status, body = %body, "Strava rejected {}", context);
        return Err(AppError::UpstreamAuth(format!(
            "{} rejected with status {}",
            context, status
        )));
    }
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(AppError::UpstreamUnavailable(format!(
            "{} failed: HTTP {}: {}",
            context, status, body
        )));
    }

    response
        .json()
        .await
        .map_err(|e| AppError::UpstreamUnavailable(format!("JSON parse error: {}", e)))
}

/// Check a resource response and parse the JSON body.
///
/// 401 is reported as an auth error so the route layer can run its
/// refresh-and-retry sequence; everything else non-2xx is an upstream
/// failure surfaced to the client.
async fn check_resource_response<T: for<'de> Deserialize<'de>>(
    response: reqwest::Response,
) -> Result<T, AppError> {
    let status = response.status();
    if status.as_u16() == 401 {
        return Err(AppError::UpstreamAuth(
            "access token expired or invalid".to_string(),
        ));
    }
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(AppError::UpstreamUnavailable(format!(
            "HTTP {}: {}",
            status, body
        )));
    }

    response
        .json()
        .await
        .map_err(|e| AppError::UpstreamUnavailable(format!("JSON parse error: {}", e)))
}
