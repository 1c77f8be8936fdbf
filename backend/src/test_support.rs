//! Test utilities for the backend crate.
//!
//! This module provides shared helpers for both unit tests (in `src/`) and
//! integration tests (in `tests/`). It is compiled for tests and behind the
//! `test-support` feature.

mod clock;
mod harness;
mod memory;
mod tokens;

pub use clock::MutableClock;
pub use harness::Harness;
pub use memory::{InMemoryContributionStore, InMemoryCreditLedger, InMemoryUserRepository};
pub use tokens::StaticTokenVerifier;
