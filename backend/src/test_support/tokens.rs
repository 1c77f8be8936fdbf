//! Token verifier double keyed by literal token strings.

use std::collections::HashMap;

use crate::domain::VerifiedIdentity;
use crate::domain::ports::{TokenVerificationError, TokenVerifier};

/// Accepts only the tokens it was seeded with.
#[derive(Debug, Default, Clone)]
pub struct StaticTokenVerifier {
    tokens: HashMap<String, VerifiedIdentity>,
}

impl StaticTokenVerifier {
    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>, identity: VerifiedIdentity) -> Self {
        self.tokens.insert(token.into(), identity);
        self
    }
}

impl TokenVerifier for StaticTokenVerifier {
    fn verify(&self, token: &str) -> Result<VerifiedIdentity, TokenVerificationError> {
        self.tokens
            .get(token)
            .cloned()
            .ok_or_else(|| TokenVerificationError::rejected("unknown test token"))
    }
}
