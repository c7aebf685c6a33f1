// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use axum::http::header;
use axum::response::Response;
use std::sync::Arc;
use travalt::config::Config;
use travalt::routes::create_router;
use travalt::services::StravaClient;
use travalt::AppState;

/// Build a test app whose Strava client points at a fake upstream
/// (normally a `wiremock::MockServer`).
#[allow(dead_code)]
pub fn create_test_app(upstream_url: &str) -> axum::Router {
    create_test_app_with_config(Config::default(), upstream_url)
}

/// Same, with a custom config (cookie domain, frontend URL, ...).
#[allow(dead_code)]
pub fn create_test_app_with_config(config: Config, upstream_url: &str) -> axum::Router {
    let strava = StravaClient::with_base_url(
        config.strava_client_id.clone(),
        config.strava_client_secret.clone(),
        upstream_url.to_string(),
    );
    create_router(Arc::new(AppState { config, strava }))
}

/// Collect all Set-Cookie header values from a response.
#[allow(dead_code)]
pub fn set_cookie_headers(response: &Response) -> Vec<String> {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .map(|value| value.to_str().unwrap().to_string())
        .collect()
}

/// Find the Set-Cookie header for a given cookie name.
#[allow(dead_code)]
pub fn find_cookie(headers: &[String], name: &str) -> String {
    headers
        .iter()
        .find(|value| value.starts_with(&format!("{name}=")))
        .cloned()
        .unwrap_or_else(|| panic!("missing Set-Cookie header for {name}: {headers:?}"))
}

/// Read a JSON response body.
#[allow(dead_code)]
pub async fn json_body(response: Response) -> serde_json::Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}
