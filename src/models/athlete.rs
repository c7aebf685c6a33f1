// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Athlete profile models.

use serde::{Deserialize, Serialize};

/// Athlete profile as returned by the Strava `/athlete` endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct Athlete {
    pub firstname: String,
    pub lastname: String,
    /// URL of the profile picture.
    pub profile: Option<String>,
}

/// Profile shape exposed to the frontend.
#[derive(Debug, Clone, Serialize)]
pub struct UserInfo {
    pub name: String,
    pub avatar: Option<String>,
}

impl From<Athlete> for UserInfo {
    fn from(athlete: Athlete) -> Self {
        Self {
            name: format!("{} {}", athlete.firstname, athlete.lastname),
            avatar: athlete.profile,
        }
    }
}
