//! Driving ports for reading the caller's account.
//!
//! Inbound adapters use these to turn a verified token into a profile view or
//! a full [`User`] without importing persistence details.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{DisplayName, EmailAddress, Error, IdentityId, User, UserRole, VerifiedIdentity};

/// Public projection of a user, as returned by `GET /users/me`.
///
/// `id` is the identity-provider id rather than the internal key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileView {
    pub id: IdentityId,
    pub email: EmailAddress,
    pub name: DisplayName,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
}

impl From<&User> for ProfileView {
    fn from(user: &User) -> Self {
        Self {
            id: user.identity_id.clone(),
            email: user.email.clone(),
            name: user.display_name.clone(),
            role: user.role,
            created_at: user.created_at,
        }
    }
}

/// Domain use-case port for reading the current user's profile.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserProfileQuery: Send + Sync {
    /// Return the profile for the authenticated caller, creating the local
    /// row on first use when the token carries enough claims.
    async fn fetch_profile(&self, identity: &VerifiedIdentity) -> Result<ProfileView, Error>;
}

/// Resolves the stored account behind a verified token.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CallerDirectory: Send + Sync {
    /// Return the live user row for `identity`.
    ///
    /// Fails with `forbidden` when the caller has no usable account.
    async fn resolve_caller(&self, identity: &VerifiedIdentity) -> Result<User, Error>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    fn profile_view_serialises_identity_id_as_id() {
        let created_at = Utc
            .with_ymd_and_hms(2024, 5, 1, 12, 0, 0)
            .single()
            .expect("valid time");
        let view = ProfileView {
            id: IdentityId::new("user_1").expect("id"),
            email: EmailAddress::new("ada@example.com").expect("email"),
            name: DisplayName::new("Ada").expect("name"),
            role: UserRole::Premier,
            created_at,
        };

        assert_eq!(
            serde_json::to_value(&view).expect("serialise"),
            json!({
                "id": "user_1",
                "email": "ada@example.com",
                "name": "Ada",
                "role": "premier",
                "createdAt": "2024-05-01T12:00:00Z",
            })
        );
    }
}
