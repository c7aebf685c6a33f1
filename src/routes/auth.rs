// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Strava OAuth authentication routes.
//!
//! The session model is deliberately stateless: the browser holds the
//! access token, the HTTP-only `refresh_token` cookie holds the refresh
//! token, and the server stores nothing. Issuing a new refresh token
//! (login or refresh) invalidates the previous one simply by overwriting
//! the cookie.

use axum::{
    extract::{Query, State},
    response::Redirect,
    routing::{get, post},
    Json, Router,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::config::Config;
use crate::error::{AppError, Result};
use crate::AppState;

/// Name of the session cookie carrying the refresh token.
pub const REFRESH_COOKIE: &str = "refresh_token";

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/login", get(login))
        .route("/callback", get(callback))
        .route("/logout", get(logout))
        .route("/refresh", post(refresh))
}

/// Build the refresh-token cookie: HttpOnly, path `/`, optional domain.
pub fn refresh_cookie(config: &Config, value: String) -> Cookie<'static> {
    let mut builder = Cookie::build((REFRESH_COOKIE, value))
        .http_only(true)
        .path("/")
        .same_site(SameSite::Lax);

    if let Some(domain) = &config.cookie_domain {
        builder = builder.domain(domain.clone());
    }

    builder.build()
}

/// Cookie that removes the refresh token (empty value, Max-Age=0).
/// Attributes must match the ones used at creation or browsers keep the
/// original cookie around.
fn removal_cookie(config: &Config) -> Cookie<'static> {
    let mut cookie = refresh_cookie(config, String::new());
    cookie.set_max_age(time::Duration::ZERO);
    cookie
}

/// Start the OAuth flow: redirect the browser to Strava's consent page.
async fn login(State(state): State<Arc<AppState>>) -> Redirect {
    let url = state.strava.authorize_url(&state.config.redirect_uri);
    tracing::info!(
        client_id = %state.config.strava_client_id,
        "Starting OAuth flow, redirecting to Strava"
    );
    Redirect::temporary(&url)
}

#[derive(Deserialize)]
pub struct CallbackParams {
    #[serde(default)]
    code: Option<String>,
    /// Set by Strava instead of `code` when the user denies consent.
    #[serde(default)]
    error: Option<String>,
}

/// OAuth callback: exchange the one-time code for a token pair, hand the
/// refresh token to the browser as a cookie and the access token as a
/// redirect query parameter.
async fn callback(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Query(params): Query<CallbackParams>,
) -> Result<(CookieJar, Redirect)> {
    if let Some(error) = params.error {
        tracing::warn!(error = %error, "OAuth error from Strava");
        let redirect = format!(
            "{}?error={}",
            state.config.frontend_url,
            urlencoding::encode(&error)
        );
        return Ok((jar, Redirect::temporary(&redirect)));
    }

    let code = params.code.ok_or(AppError::MissingAuthCode)?;

    tracing::info!("Exchanging authorization code for tokens");
    let token = state.strava.exchange_code(&code).await?;

    let jar = jar.add(refresh_cookie(&state.config, token.refresh_token));

    let redirect = format!(
        "{}?access_token={}",
        state.config.frontend_url,
        urlencoding::encode(&token.access_token)
    );
    tracing::info!(
        expires_at = %token.expires_at,
        "OAuth successful, redirecting authenticated user to frontend"
    );

    Ok((jar, Redirect::temporary(&redirect)))
}

/// Logout: clear the refresh-token cookie and send the browser home.
///
/// This is purely client-side; the upstream tokens remain valid at Strava
/// until they expire naturally.
async fn logout(State(state): State<Arc<AppState>>, jar: CookieJar) -> (CookieJar, Redirect) {
    let jar = jar.add(removal_cookie(&state.config));
    (jar, Redirect::temporary(&state.config.frontend_url))
}

#[derive(Serialize)]
struct AccessTokenResponse {
    access_token: String,
}

/// Mint a new access token from the refresh-token cookie.
///
/// A successful refresh rotates the refresh token at Strava, so the cookie
/// is overwritten with the new value in the same response.
async fn refresh(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
) -> Result<(CookieJar, Json<AccessTokenResponse>)> {
    let refresh_token = jar
        .get(REFRESH_COOKIE)
        .map(|c| c.value().to_string())
        .filter(|v| !v.is_empty())
        .ok_or(AppError::Unauthorized)?;

    let token = state.strava.refresh_token(&refresh_token).await?;

    let jar = jar.add(refresh_cookie(&state.config, token.refresh_token));

    Ok((
        jar,
        Json(AccessTokenResponse {
            access_token: token.access_token,
        }),
    ))
}
