//! In-process request helpers shared by the behaviour suites.

use actix_web::http::StatusCode;
use actix_web::test as actix_test;
use actix_web::{App, web};
use patternhub::Trace;
use patternhub::inbound::http::configure;
use patternhub::inbound::http::state::HttpState;
use serde_json::Value;

/// Status and decoded JSON body of one response.
pub struct Reply {
    pub status: StatusCode,
    pub body: Value,
}

/// Serve `request` through the `/api/v1` routes on a fresh actix system.
pub fn dispatch(state: HttpState, request: actix_test::TestRequest) -> Reply {
    actix_web::rt::System::new().block_on(async move {
        let app = actix_test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .wrap(Trace)
                .service(web::scope("/api/v1").configure(configure)),
        )
        .await;
        let response = actix_test::call_service(&app, request.to_request()).await;
        let status = response.status();
        let bytes = actix_test::read_body(response).await;
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).expect("JSON body")
        };
        Reply { status, body }
    })
}
