//! Actix middleware applied to every route.
//!
//! [`Trace`] assigns the per-request trace identifier used by logs and error
//! envelopes.

pub mod trace;

pub use trace::Trace;
