//! Bearer token verification adapters.

mod jwt;

pub use jwt::{DisabledTokenVerifier, JwtTokenVerifier};
