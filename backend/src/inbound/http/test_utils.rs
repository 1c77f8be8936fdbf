//! Test helpers for inbound HTTP components.

use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::http::header::AUTHORIZATION;
use actix_web::{App, test, web};

use crate::middleware::Trace;

use super::configure;
use super::state::HttpState;

/// Build the `/api/v1` app around `state`, with trace middleware.
pub fn test_app(
    state: HttpState,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(web::Data::new(state))
        .wrap(Trace)
        .service(web::scope("/api/v1").configure(configure))
}

/// POST `body` as JSON to `uri` with a bearer token.
pub fn authed_post(uri: &str, token: &str, body: &serde_json::Value) -> test::TestRequest {
    test::TestRequest::post()
        .uri(uri)
        .insert_header((AUTHORIZATION, format!("Bearer {token}")))
        .set_json(body)
}
