// This file is part of the product RoomGate.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

mod common;

use actix_web::{http::StatusCode, test};
use common::{FetchScript, TestHarness, authorized};
use serde_json::Value;

#[actix_web::test]
async fn capabilities_is_served_without_admin_token() {
    let harness = TestHarness::new(FetchScript::Unreachable);
    let app = test::init_service(common::build_test_app(harness.app_state.clone())).await;

    let req = test::TestRequest::get().uri("/api/capabilities").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let json: Value = test::read_body_json(resp).await;
    assert_eq!(
        json.get("api/woka/list").and_then(Value::as_str),
        Some("v1")
    );
    assert_eq!(
        json.get("api/companion/list").and_then(Value::as_str),
        Some("v1")
    );
}

#[actix_web::test]
async fn missing_admin_token_is_rejected() {
    let harness = TestHarness::new(FetchScript::Unreachable);
    let app = test::init_service(common::build_test_app(harness.app_state.clone())).await;

    let req = test::TestRequest::get()
        .uri("/api/map?playUri=http://play.example.com/foo")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    let json: Value = test::read_body_json(resp).await;
    assert_eq!(
        json.get("Code").and_then(Value::as_str),
        Some("INVALID_ADMIN_TOKEN")
    );
}

#[actix_web::test]
async fn wrong_admin_token_is_rejected() {
    let harness = TestHarness::new(FetchScript::Unreachable);
    let app = test::init_service(common::build_test_app(harness.app_state.clone())).await;

    let req = test::TestRequest::get()
        .uri("/api/map?playUri=http://play.example.com/foo")
        .insert_header(("Authorization", "not-the-token"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[actix_web::test]
async fn invalid_play_uri_is_a_bad_request() {
    let harness = TestHarness::new(FetchScript::Unreachable);
    let app = test::init_service(common::build_test_app(harness.app_state.clone())).await;

    let req = authorized(test::TestRequest::get().uri("/api/map?playUri=not-a-url")).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let json: Value = test::read_body_json(resp).await;
    assert_eq!(
        json.get("Code").and_then(Value::as_str),
        Some("INVALID_REQUEST")
    );
}

#[actix_web::test]
async fn unknown_room_is_not_found() {
    let harness = TestHarness::new(FetchScript::Unreachable);
    let app = test::init_service(common::build_test_app(harness.app_state.clone())).await;

    let req = authorized(
        test::TestRequest::get().uri("/api/map?playUri=http://play.example.com/nowhere"),
    )
    .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let json: Value = test::read_body_json(resp).await;
    assert_eq!(
        json.get("Code").and_then(Value::as_str),
        Some("UNKNOWN_ROOM")
    );
    let details = json.get("Details").and_then(Value::as_str).unwrap_or("");
    assert!(details.contains("/nowhere"));
}

#[actix_web::test]
async fn redirected_room_returns_target_without_identity_resolution() {
    // The fetcher panics on use: supplying a credential here proves the
    // redirect short-circuits before any identity work.
    let harness = TestHarness::new(FetchScript::Unreachable);
    let app = test::init_service(common::build_test_app(harness.app_state.clone())).await;

    let req = authorized(test::TestRequest::get().uri(
        "/api/map?playUri=http://play.example.com/baz&userId=vip-user&accessToken=some-token",
    ))
    .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let json: Value = test::read_body_json(resp).await;
    assert_eq!(
        json.get("redirectUrl").and_then(Value::as_str),
        Some("/baz2")
    );
    assert_eq!(harness.fetcher.call_count(), 0);
}

#[actix_web::test]
async fn anonymous_request_previews_room_metadata() {
    let harness = TestHarness::new(FetchScript::Unreachable);
    let app = test::init_service(common::build_test_app(harness.app_state.clone())).await;

    let req = authorized(
        test::TestRequest::get().uri("/api/map?playUri=http://play.example.com/foo"),
    )
    .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let json: Value = test::read_body_json(resp).await;
    assert_eq!(
        json.get("mapUrl").and_then(Value::as_str),
        Some("https://maps.example.com/foo.json")
    );
    assert_eq!(json.get("roomName").and_then(Value::as_str), Some("Foo"));
    assert_eq!(json.get("group").and_then(Value::as_str), Some("g1"));
    assert_eq!(
        json.get("authenticationMandatory").and_then(Value::as_bool),
        Some(true)
    );
    assert_eq!(
        json.get("opidWokaNamePolicy").and_then(Value::as_str),
        Some("allow_override_opid")
    );
    // Policy tag lists are server-side only.
    assert!(json.get("allowed_tags").is_none());
    assert!(json.get("editor_tags").is_none());
    assert_eq!(harness.fetcher.call_count(), 0);
}

#[actix_web::test]
async fn credentialed_request_enforces_the_allow_list() {
    let harness = TestHarness::new(FetchScript::Succeed(common::identity("staff-user")));
    let app = test::init_service(common::build_test_app(harness.app_state.clone())).await;

    let req = authorized(test::TestRequest::get().uri(
        "/api/map?playUri=http://play.example.com/bar&userId=staff-user&accessToken=token",
    ))
    .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    let json: Value = test::read_body_json(resp).await;
    assert_eq!(
        json.get("Code").and_then(Value::as_str),
        Some("ACCESS_DENIED")
    );
}

#[actix_web::test]
async fn credentialed_request_admits_matching_user() {
    let harness = TestHarness::new(FetchScript::Succeed(common::identity("vip-user")));
    let app = test::init_service(common::build_test_app(harness.app_state.clone())).await;

    let req = authorized(test::TestRequest::get().uri(
        "/api/map?playUri=http://play.example.com/bar&userId=vip-user&accessToken=token",
    ))
    .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let json: Value = test::read_body_json(resp).await;
    assert_eq!(json.get("roomName").and_then(Value::as_str), Some("Bar"));
}
