// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Offset-to-page pagination translation.
//!
//! Strava only exposes page-based pagination (`page`, `per_page`); the API
//! we expose to the frontend is offset-based. The translation is exact only
//! while `limit` stays constant across a paging session: changing `limit`
//! mid-session moves the upstream page boundaries and can skip or repeat
//! elements. That is a documented precondition of the API, not something
//! this module tries to compensate for.

/// Default page size when the client omits `limit` (or sends 0).
pub const DEFAULT_LIMIT: u32 = 5;

/// One upstream page fetch plus the local prefix to drop from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    /// Upstream page number (1-indexed).
    pub page: u32,
    /// Upstream page size.
    pub per_page: u32,
    /// Number of leading elements of the fetched page to discard.
    pub skip: usize,
}

/// Translate an offset/limit window into an upstream page fetch.
///
/// `limit = 0` is clamped to [`DEFAULT_LIMIT`] rather than dividing by
/// zero, and the page number saturates instead of overflowing for extreme
/// offsets (both values arrive straight from client query params).
pub fn translate(limit: u32, offset: u32) -> PageWindow {
    let per_page = if limit == 0 { DEFAULT_LIMIT } else { limit };
    PageWindow {
        page: (offset / per_page).saturating_add(1),
        per_page,
        skip: (offset % per_page) as usize,
    }
}
