//! Tests for bearer authentication and role checks.

use super::*;
use crate::domain::ports::MockTokenVerifier;
use crate::domain::{ErrorCode, IdentityId, UserRole};
use crate::test_support::Harness;
use actix_web::http::StatusCode;
use actix_web::{App, HttpResponse, test as actix_test};
use rstest::rstest;
use serde_json::Value;
use std::sync::Arc;

async fn whoami(identity: BearerIdentity) -> HttpResponse {
    HttpResponse::Ok().body(identity.into_inner().subject.to_string())
}

async fn call_whoami(state: HttpState, authorization: Option<&str>) -> (StatusCode, Vec<u8>) {
    let app = actix_test::init_service(
        App::new()
            .app_data(web::Data::new(state))
            .route("/whoami", web::get().to(whoami)),
    )
    .await;
    let mut request = actix_test::TestRequest::get().uri("/whoami");
    if let Some(value) = authorization {
        request = request.insert_header((AUTHORIZATION, value));
    }
    let response = actix_test::call_service(&app, request.to_request()).await;
    let status = response.status();
    (status, actix_test::read_body(response).await.to_vec())
}

fn harness_with_token() -> Harness {
    let mut harness = Harness::default();
    harness.accept_token(
        "good",
        VerifiedIdentity::subject_only(IdentityId::new("user_1").expect("id")),
    );
    harness
}

#[rstest]
#[actix_web::test]
async fn valid_bearer_token_yields_identity() {
    let (status, body) = call_whoami(harness_with_token().http_state(), Some("Bearer good")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"user_1");
}

#[rstest]
#[case::missing(None)]
#[case::wrong_scheme(Some("Basic good"))]
#[case::empty_token(Some("Bearer   "))]
#[case::unknown_token(Some("Bearer forged"))]
#[actix_web::test]
async fn unusable_credentials_are_unauthorized(#[case] authorization: Option<&str>) {
    let (status, body) = call_whoami(harness_with_token().http_state(), authorization).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    let body: Value = serde_json::from_slice(&body).expect("error body");
    assert_eq!(body["code"], "unauthorized");
}

#[rstest]
#[actix_web::test]
async fn expired_tokens_say_so() {
    let mut tokens = MockTokenVerifier::new();
    tokens
        .expect_verify()
        .returning(|_| Err(TokenVerificationError::expired()));
    let mut state = Harness::default().http_state();
    state.tokens = Arc::new(tokens);

    let (status, body) = call_whoami(state, Some("Bearer stale")).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    let body: Value = serde_json::from_slice(&body).expect("error body");
    assert_eq!(body["error"], "Token expired");
}

#[rstest]
#[case(UserRole::Guest)]
#[case(UserRole::Contributor)]
#[case(UserRole::Premier)]
#[tokio::test]
async fn non_admin_roles_are_forbidden(#[case] role: UserRole) {
    let harness = Harness::default();
    let user = harness.user("user_1", role);
    let identity = BearerIdentity(VerifiedIdentity::subject_only(user.identity_id));

    let err = require_admin(&harness.http_state(), &identity)
        .await
        .expect_err("not an admin");

    assert_eq!(err.code(), ErrorCode::Forbidden);
}

#[rstest]
#[tokio::test]
async fn admin_role_resolves_caller() {
    let harness = Harness::default();
    let admin = harness.user("admin_1", UserRole::Admin);
    let identity = BearerIdentity(VerifiedIdentity::subject_only(admin.identity_id.clone()));

    let caller = require_admin(&harness.http_state(), &identity)
        .await
        .expect("admin");

    assert_eq!(caller.id, admin.id);
}

#[rstest]
#[tokio::test]
async fn unknown_caller_is_forbidden_for_admin_routes() {
    let harness = Harness::default();
    let identity = BearerIdentity(VerifiedIdentity::subject_only(
        IdentityId::new("ghost").expect("id"),
    ));

    let err = require_admin(&harness.http_state(), &identity)
        .await
        .expect_err("no account");

    assert_eq!(err.code(), ErrorCode::Forbidden);
}
