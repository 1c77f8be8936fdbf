//! HTTP inbound adapter exposing REST endpoints.

pub mod auth;
pub mod contributions;
pub mod error;
pub mod health;
pub mod identity_config;
pub mod schemas;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod users;
pub mod validation;
pub mod webhooks;

pub use error::ApiResult;

use actix_web::web;

use crate::domain::Error;

/// JSON extractor settings that report body problems in the API envelope.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        Error::invalid_request(format!("invalid JSON body: {err}")).into()
    })
}

/// Register every `/api/v1` handler on `cfg`.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .service(contributions::approve_contribution)
        .service(contributions::reject_contribution)
        .service(contributions::submit_contribution)
        .service(webhooks::identity_webhook)
        .service(users::current_user);
}
