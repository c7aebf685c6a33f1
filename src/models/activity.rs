// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Activity summary passed through from the Strava list endpoint.

use serde::{Deserialize, Serialize};

/// Summary of one activity.
///
/// The metric fields are optional on the wire: Strava omits them for
/// activity types that don't record them (no cadence on a hike, etc.).
/// They are re-serialized to the frontend unchanged, absent fields skipped.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivitySummary {
    pub id: u64,
    pub name: String,
    pub start_date: String,
    #[serde(rename = "type")]
    pub activity_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub moving_time: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub average_speed: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub average_heartrate: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub average_cadence: Option<f64>,
}
