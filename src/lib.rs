// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Travalt: backend proxy for browsing Strava activities.
//!
//! This crate handles the Strava OAuth login flow, keeps the refresh token
//! in an HTTP-only cookie (the cookie *is* the session; there is no
//! server-side session store), and re-exposes the athlete profile and
//! activity list to the frontend under offset-based pagination.

pub mod config;
pub mod error;
pub mod middleware;
pub mod models;
pub mod pagination;
pub mod routes;
pub mod services;

use config::Config;
use services::StravaClient;

/// Shared application state. Read-only after startup; request handlers share
/// nothing else, so there are no locks anywhere in the crate.
pub struct AppState {
    pub config: Config,
    pub strava: StravaClient,
}
