//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Concrete implementations of the domain repository ports backed by
//! PostgreSQL via `diesel-async` and `bb8` connection pooling.
//!
//! - **Thin adapters**: repositories translate between Diesel rows and
//!   domain types; no business rules live here.
//! - **Internal models**: row structs (`models.rs`) and table definitions
//!   (`schema.rs`) never leave this module.
//! - **Strongly typed errors**: database failures are mapped to the port
//!   error enums.
//!
//! # Example
//!
//! ```ignore
//! use patternhub::outbound::persistence::{DbPool, DieselUserRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/patterns")).await?;
//! let users = DieselUserRepository::new(pool);
//! ```

mod diesel_contribution_repository;
mod diesel_credit_ledger;
mod diesel_error_mapping;
mod diesel_pattern_repository;
mod diesel_user_repository;
mod models;
mod pool;
mod schema;

pub use diesel_contribution_repository::DieselContributionRepository;
pub use diesel_credit_ledger::DieselCreditLedger;
pub use diesel_pattern_repository::DieselPatternRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use pool::{DEFAULT_MAX_CONNECTIONS, DbPool, PoolConfig, PoolError};
