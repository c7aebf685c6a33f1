// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - upstream Strava integration.

pub mod strava;

pub use strava::StravaClient;
