// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Proxy routes for authenticated users.
//!
//! Every handler forwards the caller's bearer token to Strava. An upstream
//! 401 triggers one refresh grant against the cookie followed by exactly
//! one retry of the original call; a second 401 is surfaced as-is. The
//! sequence is written as plain `match` arms over `Result` values so the
//! once-only retry stays visible.

use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use axum_extra::extract::cookie::CookieJar;
use axum_extra::extract::WithRejection;
use serde::Deserialize;
use std::future::Future;
use std::sync::Arc;

use crate::error::{AppError, Result};
use crate::middleware::Bearer;
use crate::models::{ActivitySummary, TokenPair, UserInfo};
use crate::pagination::{self, DEFAULT_LIMIT};
use crate::routes::auth::{refresh_cookie, REFRESH_COOKIE};
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/me", get(get_me))
        .route("/activities", get(get_activities))
}

/// Handler result whose error arm still carries the cookie jar, so a
/// rotated refresh token reaches the client even on a failed response.
type JarResult<T> = std::result::Result<(CookieJar, T), (CookieJar, AppError)>;

/// Run one upstream call with the refresh-and-retry sequence.
///
/// Attempt with the caller's token; if Strava answers 401, mint a fresh
/// access token from the refresh-token cookie, retry once, and rotate the
/// cookie in the returned jar. Refresh failure (or a missing cookie)
/// surfaces as 401 so the client re-triggers login. The refresh and the
/// retry are strictly sequential.
///
/// The jar comes back on both arms: a successful refresh invalidates the
/// old refresh token at Strava immediately, so the rotated cookie must be
/// set even when the retried call itself fails.
async fn call_with_refresh<T, F, Fut>(
    state: &Arc<AppState>,
    jar: CookieJar,
    token: String,
    call: F,
) -> (CookieJar, Result<T>)
where
    F: Fn(String) -> Fut,
    Fut: Future<Output = Result<T>>,
{
    match call(token).await {
        Ok(value) => (jar, Ok(value)),
        Err(err) if err.is_expired_token() => {
            let Some(refresh_token) = jar
                .get(REFRESH_COOKIE)
                .map(|c| c.value().to_string())
                .filter(|v| !v.is_empty())
            else {
                return (jar, Err(AppError::Unauthorized));
            };

            tracing::info!("Access token rejected upstream, refreshing");
            let TokenPair {
                access_token,
                refresh_token,
                ..
            } = match state.strava.refresh_token(&refresh_token).await {
                Ok(pair) => pair,
                Err(err) => return (jar, Err(err)),
            };

            // The old refresh token just died upstream: rotate the cookie
            // now, whatever the retry returns.
            let jar = jar.add(refresh_cookie(&state.config, refresh_token));
            (jar, call(access_token).await)
        }
        Err(err) => (jar, Err(err)),
    }
}

/// Get the current user's profile.
async fn get_me(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    bearer: Bearer,
) -> JarResult<Json<UserInfo>> {
    let strava = state.strava.clone();
    let (jar, result) = call_with_refresh(&state, jar, bearer.token, move |token| {
        let strava = strava.clone();
        async move { strava.get_athlete(&token).await }
    })
    .await;

    match result {
        Ok(athlete) => Ok((jar, Json(athlete.into()))),
        Err(err) => Err((jar, err)),
    }
}

#[derive(Deserialize)]
struct ActivitiesQuery {
    /// Page size; must stay constant while paging through one listing.
    #[serde(default = "default_limit")]
    limit: u32,
    /// Zero-based offset into the listing.
    #[serde(default)]
    offset: u32,
}

fn default_limit() -> u32 {
    DEFAULT_LIMIT
}

/// List the user's activities under offset-based pagination.
///
/// Strava only pages by (`page`, `per_page`); the offset is translated to
/// one upstream page fetch plus a dropped prefix (see [`crate::pagination`]
/// for the constant-`limit` precondition). A page shorter than `limit`
/// tells the client there is no more data.
async fn get_activities(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    bearer: Bearer,
    WithRejection(Query(params), _): WithRejection<Query<ActivitiesQuery>, AppError>,
) -> JarResult<Json<Vec<ActivitySummary>>> {
    let window = pagination::translate(params.limit, params.offset);

    tracing::debug!(
        limit = params.limit,
        offset = params.offset,
        page = window.page,
        per_page = window.per_page,
        "Fetching activities"
    );

    let strava = state.strava.clone();
    let (jar, result) = call_with_refresh(&state, jar, bearer.token, move |token| {
        let strava = strava.clone();
        async move {
            strava
                .list_activities(&token, window.page, window.per_page)
                .await
        }
    })
    .await;

    match result {
        Ok(activities) => {
            let result: Vec<ActivitySummary> =
                activities.into_iter().skip(window.skip).collect();
            Ok((jar, Json(result)))
        }
        Err(err) => Err((jar, err)),
    }
}
