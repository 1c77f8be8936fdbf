//! Bearer authentication for HTTP handlers.
//!
//! Keep the HTTP modules focused on request/response mapping by concentrating
//! credential checks and caller resolution here.

use actix_web::http::header::AUTHORIZATION;
use actix_web::{FromRequest, HttpRequest, dev::Payload, web};
use futures_util::future::{Ready, ready};
use tracing::debug;

use crate::domain::ports::TokenVerificationError;
use crate::domain::{Error, User, VerifiedIdentity};
use crate::inbound::http::state::HttpState;

use super::ApiResult;

const BEARER_PREFIX: &str = "Bearer ";

/// Verified caller identity extracted from `Authorization: Bearer <jwt>`.
///
/// Extraction fails with `401 Unauthorized` when the header is absent,
/// malformed, or the token does not verify.
#[derive(Debug, Clone)]
pub struct BearerIdentity(pub VerifiedIdentity);

impl BearerIdentity {
    /// Consume the wrapper.
    pub fn into_inner(self) -> VerifiedIdentity {
        self.0
    }
}

fn bearer_token(req: &HttpRequest) -> Option<&str> {
    req.headers()
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix(BEARER_PREFIX)
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

fn map_token_error(error: &TokenVerificationError) -> Error {
    debug!(error_kind = error.kind(), error = %error, "bearer token rejected");
    match error {
        TokenVerificationError::Expired => Error::unauthorized("Token expired"),
        _ => Error::unauthorized("Invalid token"),
    }
}

fn authenticate(req: &HttpRequest) -> ApiResult<BearerIdentity> {
    let state = req
        .app_data::<web::Data<HttpState>>()
        .ok_or_else(|| Error::internal("HTTP state is not configured"))?;
    let token = bearer_token(req).ok_or_else(|| Error::unauthorized("Unauthorized"))?;
    state
        .tokens
        .verify(token)
        .map(BearerIdentity)
        .map_err(|error| map_token_error(&error))
}

impl FromRequest for BearerIdentity {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(authenticate(req))
    }
}

/// Resolve the caller's account, rejecting deleted or unknown users.
pub async fn require_caller(state: &HttpState, identity: &BearerIdentity) -> ApiResult<User> {
    state.callers.resolve_caller(&identity.0).await
}

/// Resolve the caller and require the `admin` role.
pub async fn require_admin(state: &HttpState, identity: &BearerIdentity) -> ApiResult<User> {
    let caller = require_caller(state, identity).await?;
    if caller.role.is_admin() {
        Ok(caller)
    } else {
        Err(Error::forbidden("Admin access required"))
    }
}

#[cfg(test)]
#[path = "auth_tests.rs"]
mod tests;
