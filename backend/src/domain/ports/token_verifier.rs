//! Driven port for bearer token verification.

use crate::domain::VerifiedIdentity;

use super::define_port_error;

define_port_error! {
    /// Reasons a bearer token was refused.
    pub enum TokenVerificationError {
        /// The token could not be decoded.
        Malformed { message: String } => "bearer token is malformed: {message}",
        /// The token's `exp` claim has passed.
        Expired => "bearer token has expired",
        /// Signature, issuer or algorithm did not match.
        Rejected { message: String } => "bearer token was rejected: {message}",
        /// Signature checks passed but a claim failed domain validation.
        InvalidClaims { message: String } => "bearer token claims are invalid: {message}",
    }
}

/// Verifies identity-provider issued tokens.
#[cfg_attr(test, mockall::automock)]
pub trait TokenVerifier: Send + Sync {
    /// Verify `token` and return the identity it asserts.
    fn verify(&self, token: &str) -> Result<VerifiedIdentity, TokenVerificationError>;
}
