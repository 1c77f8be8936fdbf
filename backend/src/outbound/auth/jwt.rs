//! RS256 session-token verification.
//!
//! The identity provider signs session tokens with its RSA key. Only the
//! public half is configured here; `sub` is required, `email` and `name` are
//! read when present.

use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use serde::Deserialize;
use tracing::debug;

use crate::domain::ports::{TokenVerificationError, TokenVerifier};
use crate::domain::{EmailAddress, IdentityId, VerifiedIdentity};

/// Accepted clock skew for `exp` and `nbf`, in seconds.
const LEEWAY_SECONDS: u64 = 30;

#[derive(Debug, Deserialize)]
struct SessionClaims {
    #[serde(default)]
    sub: String,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    name: Option<String>,
}

/// Verifier holding the provider's RSA public key.
#[derive(Clone)]
pub struct JwtTokenVerifier {
    key: DecodingKey,
    validation: Validation,
}

impl JwtTokenVerifier {
    /// Build from a PEM-encoded RSA public key.
    ///
    /// When `issuer` is set, tokens must carry a matching `iss` claim.
    pub fn from_rsa_pem(
        pem: &str,
        issuer: Option<&str>,
    ) -> Result<Self, jsonwebtoken::errors::Error> {
        let key = DecodingKey::from_rsa_pem(pem.as_bytes())?;
        let mut validation = Validation::new(Algorithm::RS256);
        validation.leeway = LEEWAY_SECONDS;
        validation.validate_aud = false;
        validation.set_required_spec_claims(&["exp", "sub"]);
        if let Some(issuer) = issuer {
            validation.set_issuer(&[issuer]);
        }
        Ok(Self { key, validation })
    }
}

fn map_jwt_error(error: &jsonwebtoken::errors::Error) -> TokenVerificationError {
    match error.kind() {
        ErrorKind::ExpiredSignature => TokenVerificationError::expired(),
        ErrorKind::InvalidToken | ErrorKind::Base64(_) | ErrorKind::Json(_) | ErrorKind::Utf8(_) => {
            TokenVerificationError::malformed(error.to_string())
        }
        ErrorKind::MissingRequiredClaim(_) | ErrorKind::InvalidIssuer => {
            TokenVerificationError::invalid_claims(error.to_string())
        }
        _ => TokenVerificationError::rejected(error.to_string()),
    }
}

impl TokenVerifier for JwtTokenVerifier {
    fn verify(&self, token: &str) -> Result<VerifiedIdentity, TokenVerificationError> {
        let claims = decode::<SessionClaims>(token, &self.key, &self.validation)
            .map_err(|err| map_jwt_error(&err))?
            .claims;

        let subject = IdentityId::new(claims.sub)
            .map_err(|err| TokenVerificationError::invalid_claims(err.to_string()))?;
        let email = claims.email.and_then(|raw| match EmailAddress::new(raw) {
            Ok(email) => Some(email),
            Err(err) => {
                debug!(identity_id = %subject, error = %err, "ignoring invalid email claim");
                None
            }
        });

        Ok(VerifiedIdentity {
            subject,
            email,
            name: claims.name,
        })
    }
}

/// Verifier used when no public key is configured; rejects every token.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledTokenVerifier;

impl TokenVerifier for DisabledTokenVerifier {
    fn verify(&self, _token: &str) -> Result<VerifiedIdentity, TokenVerificationError> {
        Err(TokenVerificationError::rejected(
            "bearer authentication is not configured",
        ))
    }
}
