//! Tests for the current-user endpoint.

use super::*;
use crate::domain::{EmailAddress, IdentityId, UserRole, VerifiedIdentity};
use crate::inbound::http::test_utils::test_app;
use crate::test_support::Harness;
use actix_web::http::StatusCode;
use actix_web::http::header::AUTHORIZATION;
use actix_web::test as actix_test;
use rstest::rstest;
use serde_json::{Value, json};

async fn get_me(harness: &Harness, token: &str) -> (StatusCode, Option<String>, Value) {
    let app = actix_test::init_service(test_app(harness.http_state())).await;
    let request = actix_test::TestRequest::get()
        .uri("/api/v1/users/me")
        .insert_header((AUTHORIZATION, format!("Bearer {token}")))
        .to_request();
    let response = actix_test::call_service(&app, request).await;
    let status = response.status();
    let cache = response
        .headers()
        .get(header::CACHE_CONTROL)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned);
    let body: Value = actix_test::read_body_json(response).await;
    (status, cache, body)
}

fn identity(subject: &str, email: Option<&str>) -> VerifiedIdentity {
    VerifiedIdentity {
        subject: IdentityId::new(subject).expect("id"),
        email: email.map(|e| EmailAddress::new(e).expect("email")),
        name: None,
    }
}

#[rstest]
#[actix_web::test]
async fn returns_stored_profile() {
    let mut harness = Harness::default();
    let user = harness.user("user_1", UserRole::Premier);
    harness.sign_in("token", &user);

    let (status, cache, body) = get_me(&harness, "token").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(cache.as_deref(), Some("private, no-cache, must-revalidate"));
    assert_eq!(
        body,
        json!({
            "success": true,
            "user": {
                "id": "user_1",
                "email": "user_1@example.com",
                "name": "user_1",
                "role": "premier",
                "createdAt": "2026-02-24T10:30:00Z",
            }
        })
    );
}

#[rstest]
#[actix_web::test]
async fn first_request_with_email_claim_creates_account() {
    let mut harness = Harness::default();
    harness.accept_token("token", identity("user_new", Some("grace@example.com")));

    let (status, _, body) = get_me(&harness, "token").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["name"], "grace");
    assert_eq!(body["user"]["role"], "contributor");
    assert_eq!(harness.users.len(), 1);
}

#[rstest]
#[actix_web::test]
async fn unknown_user_without_email_is_not_found() {
    let mut harness = Harness::default();
    harness.accept_token("token", identity("ghost", None));

    let (status, _, body) = get_me(&harness, "token").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "User not found");
    assert!(harness.users.is_empty());
}

#[rstest]
#[actix_web::test]
async fn cached_profile_survives_until_ttl() {
    let mut harness = Harness::default();
    let user = harness.user("user_1", UserRole::Contributor);
    harness.sign_in("token", &user);
    get_me(&harness, "token").await;

    let mut renamed = user.clone();
    renamed.role = UserRole::Admin;
    harness.users.put(renamed);

    let (_, _, cached) = get_me(&harness, "token").await;
    assert_eq!(cached["user"]["role"], "contributor");

    harness.clock.advance_seconds(901);
    let (_, _, fresh) = get_me(&harness, "token").await;
    assert_eq!(fresh["user"]["role"], "admin");
}
