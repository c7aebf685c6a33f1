// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Data models for the application.
//!
//! All of these are pass-through projections of Strava JSON; none of them
//! outlive a single request/response cycle.

pub mod activity;
pub mod athlete;
pub mod token;

pub use activity::ActivitySummary;
pub use athlete::{Athlete, UserInfo};
pub use token::TokenPair;
