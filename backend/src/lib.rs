//! Pattern catalogue backend: contribution review, identity-provider sync and
//! account profiles behind a REST API.
//!
//! The crate follows a ports-and-adapters layout. [`domain`] owns the types,
//! ports and services; [`inbound`] translates HTTP requests into service
//! calls; [`outbound`] implements the ports over PostgreSQL, Redis and JWT
//! verification.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod settings;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use domain::TraceId;
pub use middleware::Trace;
