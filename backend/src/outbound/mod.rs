//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **persistence**: PostgreSQL-backed repositories using Diesel ORM
//! - **cache**: profile caches (in-process and Redis)
//! - **auth**: bearer token verification against the identity provider key
//!
//! Adapters are thin translators between domain types and
//! infrastructure-specific representations. They contain no business logic.

pub mod auth;
pub mod cache;
pub mod persistence;
