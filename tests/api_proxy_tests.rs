// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Proxy gateway tests: bearer gating, profile mapping, and the
//! refresh-and-retry sequence on upstream 401.

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use serde_json::json;
use tower::ServiceExt;
use wiremock::matchers::{body_string_contains, header as header_eq, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

mod common;

fn athlete_json() -> serde_json::Value {
    json!({
        "id": 12345,
        "firstname": "Jan",
        "lastname": "Ullrich",
        "profile": "https://cdn.test/avatar.jpg"
    })
}

#[tokio::test]
async fn test_me_requires_bearer() {
    let app = common::create_test_app("https://upstream.test");

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/v1/me")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_me_rejects_empty_bearer() {
    let app = common::create_test_app("https://upstream.test");

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/v1/me")
                .header(header::AUTHORIZATION, "Bearer ")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_me_maps_athlete_profile() {
    let upstream = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v3/athlete"))
        .and(header_eq("authorization", "Bearer acc-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(athlete_json()))
        .expect(1)
        .mount(&upstream)
        .await;

    let app = common::create_test_app(&upstream.uri());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/v1/me")
                .header(header::AUTHORIZATION, "Bearer acc-1")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = common::json_body(response).await;
    assert_eq!(body["name"], "Jan Ullrich");
    assert_eq!(body["avatar"], "https://cdn.test/avatar.jpg");
}

/// Fresh token straight from `/callback`: using it immediately must not
/// touch the refresh path.
#[tokio::test]
async fn test_fresh_token_does_not_trigger_refresh() {
    let upstream = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .and(body_string_contains("grant_type=authorization_code"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "acc-1",
            "refresh_token": "ref-1",
            "expires_at": 4102444800i64
        })))
        .expect(1)
        .mount(&upstream)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/v3/athlete"))
        .and(header_eq("authorization", "Bearer acc-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(athlete_json()))
        .expect(1)
        .mount(&upstream)
        .await;

    let app = common::create_test_app(&upstream.uri());

    let callback = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/v1/callback?code=good-code")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(callback.status(), StatusCode::TEMPORARY_REDIRECT);

    let me = app
        .oneshot(
            Request::builder()
                .uri("/api/v1/me")
                .header(header::AUTHORIZATION, "Bearer acc-1")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(me.status(), StatusCode::OK);
    // expect(1) on the token mock verifies no refresh grant was issued
}

#[tokio::test]
async fn test_expired_token_refreshed_and_retried_once() {
    let upstream = MockServer::start().await;

    // Stale token: upstream rejects it
    Mock::given(method("GET"))
        .and(path("/api/v3/athlete"))
        .and(header_eq("authorization", "Bearer stale"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "message": "Authorization Error"
        })))
        .expect(1)
        .mount(&upstream)
        .await;

    // Refresh grant rotates the pair
    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .and(body_string_contains("grant_type=refresh_token"))
        .and(body_string_contains("refresh_token=ref-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "fresh",
            "refresh_token": "ref-2",
            "expires_at": 4102444800i64
        })))
        .expect(1)
        .mount(&upstream)
        .await;

    // Retried call with the new token succeeds
    Mock::given(method("GET"))
        .and(path("/api/v3/athlete"))
        .and(header_eq("authorization", "Bearer fresh"))
        .respond_with(ResponseTemplate::new(200).set_body_json(athlete_json()))
        .expect(1)
        .mount(&upstream)
        .await;

    let app = common::create_test_app(&upstream.uri());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/v1/me")
                .header(header::AUTHORIZATION, "Bearer stale")
                .header(header::COOKIE, "refresh_token=ref-1")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    // Client gets the intended payload and the rotated cookie
    assert_eq!(response.status(), StatusCode::OK);

    let cookies = common::set_cookie_headers(&response);
    let cookie = common::find_cookie(&cookies, "refresh_token");
    assert!(cookie.starts_with("refresh_token=ref-2"));

    let body = common::json_body(response).await;
    assert_eq!(body["name"], "Jan Ullrich");
}

#[tokio::test]
async fn test_expired_token_without_cookie_is_unauthorized() {
    let upstream = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v3/athlete"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&upstream)
        .await;

    // No cookie: the refresh grant must not be attempted
    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&upstream)
        .await;

    let app = common::create_test_app(&upstream.uri());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/v1/me")
                .header(header::AUTHORIZATION, "Bearer stale")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_refresh_failure_surfaces_as_unauthorized() {
    let upstream = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v3/athlete"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&upstream)
        .await;

    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "message": "Bad Request"
        })))
        .expect(1)
        .mount(&upstream)
        .await;

    let app = common::create_test_app(&upstream.uri());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/v1/me")
                .header(header::AUTHORIZATION, "Bearer stale")
                .header(header::COOKIE, "refresh_token=revoked")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

/// A successful refresh kills the old refresh token at Strava, so the
/// rotated cookie must reach the client even when the retried call fails.
#[tokio::test]
async fn test_rotated_cookie_survives_failed_retry() {
    let upstream = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v3/athlete"))
        .and(header_eq("authorization", "Bearer stale"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&upstream)
        .await;

    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .and(body_string_contains("grant_type=refresh_token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "fresh",
            "refresh_token": "ref-2",
            "expires_at": 4102444800i64
        })))
        .expect(1)
        .mount(&upstream)
        .await;

    // The retried call hits an upstream outage
    Mock::given(method("GET"))
        .and(path("/api/v3/athlete"))
        .and(header_eq("authorization", "Bearer fresh"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&upstream)
        .await;

    let app = common::create_test_app(&upstream.uri());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/v1/me")
                .header(header::AUTHORIZATION, "Bearer stale")
                .header(header::COOKIE, "refresh_token=ref-1")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    // The request still fails, but the cookie carries the new refresh token
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

    let cookies = common::set_cookie_headers(&response);
    let cookie = common::find_cookie(&cookies, "refresh_token");
    assert!(cookie.starts_with("refresh_token=ref-2"));
}

/// The retry happens exactly once: a second 401 after a successful refresh
/// is surfaced, not refreshed again.
#[tokio::test]
async fn test_second_401_after_refresh_is_surfaced() {
    let upstream = MockServer::start().await;

    // Upstream rejects every token, fresh or not
    Mock::given(method("GET"))
        .and(path("/api/v3/athlete"))
        .respond_with(ResponseTemplate::new(401))
        .expect(2)
        .mount(&upstream)
        .await;

    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "fresh",
            "refresh_token": "ref-2",
            "expires_at": 4102444800i64
        })))
        .expect(1)
        .mount(&upstream)
        .await;

    let app = common::create_test_app(&upstream.uri());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/v1/me")
                .header(header::AUTHORIZATION, "Bearer stale")
                .header(header::COOKIE, "refresh_token=ref-1")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // The refresh itself succeeded, so the cookie is still rotated
    let cookies = common::set_cookie_headers(&response);
    let cookie = common::find_cookie(&cookies, "refresh_token");
    assert!(cookie.starts_with("refresh_token=ref-2"));
}

#[tokio::test]
async fn test_upstream_outage_is_bad_gateway() {
    let upstream = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v3/athlete"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&upstream)
        .await;

    let app = common::create_test_app(&upstream.uri());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/v1/me")
                .header(header::AUTHORIZATION, "Bearer acc-1")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    // Transport-level upstream failures are surfaced, never defaulted to
    // an empty result
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
}
