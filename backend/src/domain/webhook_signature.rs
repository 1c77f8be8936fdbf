//! Webhook signature verification (Standard Webhooks / Svix scheme).
//!
//! Each delivery carries three correlated headers: a message id, a Unix
//! timestamp and a signature list. The signed content is
//! `{id}.{timestamp}.{raw body}`, authenticated with HMAC-SHA256 under the
//! shared secret. The signature header holds space-separated `v1,<base64>`
//! entries; any one match is sufficient.
//!
//! Verification runs before an event is decoded, so a forged delivery never
//! reaches the store.

use base64::prelude::*;
use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256};
use zeroize::Zeroizing;

type HmacSha256 = Hmac<Sha256>;

/// Accepted clock skew between signer and verifier, in seconds.
pub const TIMESTAMP_TOLERANCE_SECONDS: i64 = 300;

/// Optional prefix on provider-issued secrets.
const SECRET_PREFIX: &str = "whsec_";

/// Failures raised while verifying a delivery.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WebhookSignatureError {
    #[error("missing webhook header: {name}")]
    MissingHeader { name: &'static str },
    #[error("webhook timestamp is not a Unix timestamp")]
    InvalidTimestamp,
    #[error("webhook timestamp is outside the accepted tolerance")]
    StaleTimestamp,
    #[error("no webhook signature matched")]
    SignatureMismatch,
}

/// Failures raised while parsing the configured secret.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WebhookSecretError {
    #[error("webhook secret must not be empty")]
    Empty,
    #[error("webhook secret is not valid base64")]
    InvalidEncoding,
}

/// Decoded signing key. The bytes are wiped on drop.
#[derive(Clone)]
pub struct WebhookSecret(Zeroizing<Vec<u8>>);

impl WebhookSecret {
    /// Parse a provider secret, with or without the `whsec_` prefix.
    pub fn parse(raw: &str) -> Result<Self, WebhookSecretError> {
        let trimmed = raw.trim();
        let encoded = trimmed.strip_prefix(SECRET_PREFIX).unwrap_or(trimmed);
        if encoded.is_empty() {
            return Err(WebhookSecretError::Empty);
        }
        BASE64_STANDARD
            .decode(encoded)
            .map(|bytes| Self(Zeroizing::new(bytes)))
            .map_err(|_| WebhookSecretError::InvalidEncoding)
    }

    /// Short SHA-256 fingerprint suitable for logs.
    pub fn fingerprint(&self) -> String {
        let digest = Sha256::digest(self.0.as_slice());
        hex::encode(digest.get(..8).unwrap_or_default())
    }
}

impl std::fmt::Debug for WebhookSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("WebhookSecret").field(&"<redacted>").finish()
    }
}

/// Header values of one delivery. Any may be absent on a hostile request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WebhookHeaders {
    pub id: Option<String>,
    pub timestamp: Option<String>,
    pub signature: Option<String>,
}

fn require<'a>(
    value: Option<&'a str>,
    name: &'static str,
) -> Result<&'a str, WebhookSignatureError> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or(WebhookSignatureError::MissingHeader { name })
}

/// Verify `body` against `headers` at time `now`.
///
/// # Examples
/// ```
/// use chrono::{TimeZone, Utc};
/// use patternhub::domain::{WebhookHeaders, WebhookSecret, verify_webhook_signature};
///
/// let secret = WebhookSecret::parse("whsec_MfKQ9r8GKYqrTwjUPD8ILPZIo2LaLaSw").expect("secret");
/// let headers = WebhookHeaders {
///     id: Some("msg_p5jXN8AQM9LWM0D4loKWxJek".into()),
///     timestamp: Some("1614265330".into()),
///     signature: Some("v1,g0hM9SsE+OTPJTGt/tmIKtSyZlE3uFJELVlNIOLJ1OE=".into()),
/// };
/// let now = Utc.timestamp_opt(1_614_265_330, 0).single().expect("valid time");
/// assert!(verify_webhook_signature(&secret, &headers, br#"{"test": 2432232314}"#, now).is_ok());
/// ```
pub fn verify_webhook_signature(
    secret: &WebhookSecret,
    headers: &WebhookHeaders,
    body: &[u8],
    now: DateTime<Utc>,
) -> Result<(), WebhookSignatureError> {
    let id = require(headers.id.as_deref(), "svix-id")?;
    let timestamp = require(headers.timestamp.as_deref(), "svix-timestamp")?;
    let signature = require(headers.signature.as_deref(), "svix-signature")?;

    let sent_at: i64 = timestamp
        .parse()
        .map_err(|_| WebhookSignatureError::InvalidTimestamp)?;
    if now.timestamp().abs_diff(sent_at) > TIMESTAMP_TOLERANCE_SECONDS.unsigned_abs() {
        return Err(WebhookSignatureError::StaleTimestamp);
    }

    let mut signed = Vec::with_capacity(id.len() + timestamp.len() + body.len() + 2);
    signed.extend_from_slice(id.as_bytes());
    signed.push(b'.');
    signed.extend_from_slice(timestamp.as_bytes());
    signed.push(b'.');
    signed.extend_from_slice(body);

    for candidate in signature.split_whitespace() {
        let Some(encoded) = candidate.strip_prefix("v1,") else {
            continue;
        };
        let Ok(expected) = BASE64_STANDARD.decode(encoded) else {
            continue;
        };
        let Ok(mut mac) = HmacSha256::new_from_slice(&secret.0) else {
            return Err(WebhookSignatureError::SignatureMismatch);
        };
        mac.update(&signed);
        // Constant-time comparison.
        if mac.verify_slice(&expected).is_ok() {
            return Ok(());
        }
    }

    Err(WebhookSignatureError::SignatureMismatch)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rstest::{fixture, rstest};

    const SECRET: &str = "whsec_MfKQ9r8GKYqrTwjUPD8ILPZIo2LaLaSw";
    const MSG_ID: &str = "msg_p5jXN8AQM9LWM0D4loKWxJek";
    const TIMESTAMP: i64 = 1_614_265_330;
    const BODY: &[u8] = br#"{"test": 2432232314}"#;
    const SIGNATURE: &str = "v1,g0hM9SsE+OTPJTGt/tmIKtSyZlE3uFJELVlNIOLJ1OE=";

    #[fixture]
    fn secret() -> WebhookSecret {
        WebhookSecret::parse(SECRET).expect("fixture secret decodes")
    }

    fn reference_headers() -> WebhookHeaders {
        WebhookHeaders {
            id: Some(MSG_ID.to_owned()),
            timestamp: Some(TIMESTAMP.to_string()),
            signature: Some(SIGNATURE.to_owned()),
        }
    }

    #[fixture]
    fn headers() -> WebhookHeaders {
        reference_headers()
    }

    fn at(seconds: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(seconds, 0).single().expect("valid timestamp")
    }

    #[rstest]
    fn accepts_reference_vector(secret: WebhookSecret, headers: WebhookHeaders) {
        assert_eq!(
            verify_webhook_signature(&secret, &headers, BODY, at(TIMESTAMP)),
            Ok(())
        );
    }

    #[rstest]
    fn accepts_when_any_listed_signature_matches(
        secret: WebhookSecret,
        mut headers: WebhookHeaders,
    ) {
        headers.signature = Some(format!("v1,bm9wZQ== v2,ignored {SIGNATURE}"));
        assert!(verify_webhook_signature(&secret, &headers, BODY, at(TIMESTAMP)).is_ok());
    }

    #[rstest]
    fn rejects_tampered_body(secret: WebhookSecret, headers: WebhookHeaders) {
        assert_eq!(
            verify_webhook_signature(&secret, &headers, br#"{"test": 1}"#, at(TIMESTAMP)),
            Err(WebhookSignatureError::SignatureMismatch)
        );
    }

    #[rstest]
    fn rejects_other_secret(headers: WebhookHeaders) {
        let other = WebhookSecret::parse("whsec_c2VjcmV0LWtleS1mb3ItdGVzdHM=").expect("secret");
        assert_eq!(
            verify_webhook_signature(&other, &headers, BODY, at(TIMESTAMP)),
            Err(WebhookSignatureError::SignatureMismatch)
        );
    }

    #[rstest]
    #[case(TIMESTAMP + TIMESTAMP_TOLERANCE_SECONDS, true)]
    #[case(TIMESTAMP - TIMESTAMP_TOLERANCE_SECONDS, true)]
    #[case(TIMESTAMP + TIMESTAMP_TOLERANCE_SECONDS + 1, false)]
    #[case(TIMESTAMP - TIMESTAMP_TOLERANCE_SECONDS - 1, false)]
    fn enforces_timestamp_tolerance(
        secret: WebhookSecret,
        headers: WebhookHeaders,
        #[case] now: i64,
        #[case] accepted: bool,
    ) {
        let result = verify_webhook_signature(&secret, &headers, BODY, at(now));
        if accepted {
            assert!(result.is_ok());
        } else {
            assert_eq!(result, Err(WebhookSignatureError::StaleTimestamp));
        }
    }

    #[rstest]
    #[case::far_past(i64::MIN)]
    #[case::far_future(i64::MAX)]
    fn extreme_timestamps_are_stale(
        secret: WebhookSecret,
        mut headers: WebhookHeaders,
        #[case] sent_at: i64,
    ) {
        headers.timestamp = Some(sent_at.to_string());
        assert_eq!(
            verify_webhook_signature(&secret, &headers, BODY, at(TIMESTAMP)),
            Err(WebhookSignatureError::StaleTimestamp)
        );
    }

    #[rstest]
    #[case::id(WebhookHeaders { id: None, ..reference_headers() }, "svix-id")]
    #[case::timestamp(WebhookHeaders { timestamp: None, ..reference_headers() }, "svix-timestamp")]
    #[case::signature(WebhookHeaders { signature: Some(" ".into()), ..reference_headers() }, "svix-signature")]
    fn reports_missing_headers(
        secret: WebhookSecret,
        #[case] headers: WebhookHeaders,
        #[case] name: &'static str,
    ) {
        assert_eq!(
            verify_webhook_signature(&secret, &headers, BODY, at(TIMESTAMP)),
            Err(WebhookSignatureError::MissingHeader { name })
        );
    }

    #[rstest]
    fn rejects_non_numeric_timestamp(secret: WebhookSecret, mut headers: WebhookHeaders) {
        headers.timestamp = Some("yesterday".to_owned());
        assert_eq!(
            verify_webhook_signature(&secret, &headers, BODY, at(TIMESTAMP)),
            Err(WebhookSignatureError::InvalidTimestamp)
        );
    }

    #[rstest]
    #[case("")]
    #[case("whsec_")]
    fn empty_secrets_are_rejected(#[case] raw: &str) {
        assert!(matches!(
            WebhookSecret::parse(raw),
            Err(WebhookSecretError::Empty)
        ));
    }

    #[rstest]
    fn non_base64_secrets_are_rejected() {
        assert!(matches!(
            WebhookSecret::parse("whsec_***"),
            Err(WebhookSecretError::InvalidEncoding)
        ));
    }

    #[rstest]
    fn fingerprint_is_stable_and_short(secret: WebhookSecret) {
        assert_eq!(secret.fingerprint().len(), 16);
        assert_eq!(secret.fingerprint(), secret.fingerprint());
        assert!(!format!("{secret:?}").contains("MfKQ"));
    }
}
