//! Identity-provider lifecycle events.
//!
//! The provider posts an envelope `{ "type": "...", "data": { ... } }` where
//! `data` is its user object. This module decodes that envelope and derives
//! the local [`UserProfile`] from it:
//!
//! - email: the address whose id matches `primary_email_address_id`, else the
//!   first listed address;
//! - display name: first name, then username, then the email local part;
//! - role: `public_metadata.role`, falling back to `contributor`.

use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use super::{DisplayName, EmailAddress, IdentityId, UserProfile, UserRole, UserValidationError};

/// Event type for account creation.
pub const USER_CREATED: &str = "user.created";
/// Event type for account updates.
pub const USER_UPDATED: &str = "user.updated";
/// Event type for account deletion.
pub const USER_DELETED: &str = "user.deleted";

/// Decoding and derivation failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdentityEventError {
    #[error("malformed identity event: {message}")]
    Malformed { message: String },
    #[error("identity event for {identity_id} carries no email address")]
    MissingEmail { identity_id: String },
    #[error("identity event field {field} is invalid: {source}")]
    InvalidField {
        field: &'static str,
        #[source]
        source: UserValidationError,
    },
}

/// One email entry of the provider's user object.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ProviderEmail {
    pub id: Option<String>,
    pub email_address: String,
}

/// Provider user object carried by created and updated events.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct ProviderUser {
    pub id: String,
    #[serde(default)]
    pub email_addresses: Vec<ProviderEmail>,
    pub primary_email_address_id: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub username: Option<String>,
    #[serde(default)]
    pub public_metadata: Option<Value>,
}

/// Payload of a deletion event; the provider only sends the id.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DeletedProviderUser {
    pub id: Option<String>,
}

/// Decoded lifecycle event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdentityEvent {
    UserCreated(ProviderUser),
    UserUpdated(ProviderUser),
    UserDeleted(DeletedProviderUser),
    /// Event types this service does not act on.
    Unhandled { event_type: String },
}

#[derive(Deserialize)]
struct Envelope {
    #[serde(rename = "type")]
    event_type: String,
    #[serde(default)]
    data: Value,
}

fn malformed(error: impl std::fmt::Display) -> IdentityEventError {
    IdentityEventError::Malformed {
        message: error.to_string(),
    }
}

impl IdentityEvent {
    /// Decode a raw webhook body.
    ///
    /// # Examples
    /// ```
    /// use patternhub::domain::IdentityEvent;
    ///
    /// let body = br#"{"type":"user.deleted","data":{"id":"user_1","deleted":true}}"#;
    /// let event = IdentityEvent::from_slice(body).expect("valid envelope");
    /// assert_eq!(event.event_type(), "user.deleted");
    /// ```
    pub fn from_slice(body: &[u8]) -> Result<Self, IdentityEventError> {
        let envelope: Envelope = serde_json::from_slice(body).map_err(malformed)?;
        match envelope.event_type.as_str() {
            USER_CREATED => serde_json::from_value(envelope.data)
                .map(Self::UserCreated)
                .map_err(malformed),
            USER_UPDATED => serde_json::from_value(envelope.data)
                .map(Self::UserUpdated)
                .map_err(malformed),
            USER_DELETED => serde_json::from_value(envelope.data)
                .map(Self::UserDeleted)
                .map_err(malformed),
            _ => Ok(Self::Unhandled {
                event_type: envelope.event_type,
            }),
        }
    }

    /// The wire event type.
    pub fn event_type(&self) -> &str {
        match self {
            Self::UserCreated(_) => USER_CREATED,
            Self::UserUpdated(_) => USER_UPDATED,
            Self::UserDeleted(_) => USER_DELETED,
            Self::Unhandled { event_type } => event_type,
        }
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

impl ProviderUser {
    fn primary_email(&self) -> Option<&str> {
        let primary = self.primary_email_address_id.as_deref().and_then(|primary| {
            self.email_addresses
                .iter()
                .find(|entry| entry.id.as_deref() == Some(primary))
        });
        primary
            .or_else(|| self.email_addresses.first())
            .map(|entry| entry.email_address.as_str())
    }

    fn role(&self) -> UserRole {
        let raw = self
            .public_metadata
            .as_ref()
            .and_then(|meta| meta.get("role"))
            .and_then(Value::as_str);
        match raw {
            Some(value) => value.parse().unwrap_or_else(|_| {
                debug!(role = value, "unknown provider role, defaulting to contributor");
                UserRole::default()
            }),
            None => UserRole::default(),
        }
    }

    /// Derive the local profile fields.
    pub fn to_profile(&self) -> Result<UserProfile, IdentityEventError> {
        let identity_id = IdentityId::new(self.id.as_str()).map_err(|source| {
            IdentityEventError::InvalidField {
                field: "id",
                source,
            }
        })?;
        let raw_email = self
            .primary_email()
            .ok_or_else(|| IdentityEventError::MissingEmail {
                identity_id: identity_id.to_string(),
            })?;
        let email = EmailAddress::new(raw_email).map_err(|source| {
            IdentityEventError::InvalidField {
                field: "email_addresses",
                source,
            }
        })?;
        let name = non_blank(self.first_name.as_deref())
            .or_else(|| non_blank(self.username.as_deref()))
            .unwrap_or_else(|| email.local_part());
        let display_name = DisplayName::new(name).map_err(|source| {
            IdentityEventError::InvalidField {
                field: "first_name",
                source,
            }
        })?;

        Ok(UserProfile {
            identity_id,
            email,
            display_name,
            role: self.role(),
        })
    }
}
