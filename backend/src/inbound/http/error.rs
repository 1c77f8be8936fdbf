//! HTTP adapter mapping for domain errors.
//!
//! Domain errors render as the JSON error envelope with a status derived from
//! their code. Internal failures are logged here and reach the client only as
//! a generic message plus trace id.

use std::borrow::Cow;

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use tracing::error;

use crate::domain::{Error, ErrorCode, TRACE_ID_HEADER};

/// Convenient result alias for HTTP handlers.
pub type ApiResult<T> = Result<T, Error>;

/// Message returned in place of any internal failure detail.
const INTERNAL_MESSAGE: &str = "Internal server error";

/// The payload a client may see: internal failures keep only their trace id.
fn client_view(error: &Error) -> Cow<'_, Error> {
    if !matches!(error.code(), ErrorCode::InternalError) {
        return Cow::Borrowed(error);
    }
    error!(
        trace_id = error.trace_id(),
        error = %error.message(),
        "request failed with internal error"
    );
    let redacted = Error::internal(INTERNAL_MESSAGE);
    Cow::Owned(match error.trace_id() {
        Some(id) => redacted.with_trace_id(id.to_owned()),
        None => redacted,
    })
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        match self.code() {
            ErrorCode::InvalidRequest | ErrorCode::InvalidState => StatusCode::BAD_REQUEST,
            ErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,
            ErrorCode::Forbidden => StatusCode::FORBIDDEN,
            ErrorCode::NotFound => StatusCode::NOT_FOUND,
            ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let mut reply = HttpResponse::build(self.status_code());
        if let Some(id) = self.trace_id() {
            reply.insert_header((TRACE_ID_HEADER, id.to_owned()));
        }
        reply.json(client_view(self).as_ref())
    }
}

impl From<actix_web::Error> for Error {
    fn from(err: actix_web::Error) -> Self {
        error!(error = %err, "actix error promoted to domain error");
        Error::internal(INTERNAL_MESSAGE)
    }
}

#[cfg(test)]
mod tests;
