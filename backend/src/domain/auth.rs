//! Authenticated caller identity.

use super::{DisplayName, EmailAddress, IdentityId, UserProfile, UserRole};

/// Claims taken from a verified bearer token.
///
/// `subject` is the identity-provider user id. `email` and `name` are
/// optional session claims; when present they allow a local user row to be
/// created on the caller's first request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedIdentity {
    pub subject: IdentityId,
    pub email: Option<EmailAddress>,
    pub name: Option<String>,
}

impl VerifiedIdentity {
    /// Identity with only a subject claim.
    pub fn subject_only(subject: IdentityId) -> Self {
        Self {
            subject,
            email: None,
            name: None,
        }
    }

    /// Derive a profile for first-request provisioning.
    ///
    /// Returns `None` without an email claim. The display name follows the
    /// webhook rules: the `name` claim when non-blank, else the email local
    /// part. The role is always the default.
    pub fn provisional_profile(&self) -> Option<UserProfile> {
        let email = self.email.clone()?;
        let name = self
            .name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| email.local_part());
        let display_name = DisplayName::new(name).ok()?;
        Some(UserProfile {
            identity_id: self.subject.clone(),
            email,
            display_name,
            role: UserRole::default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn identity(email: Option<&str>, name: Option<&str>) -> VerifiedIdentity {
        VerifiedIdentity {
            subject: IdentityId::new("user_1").expect("valid id"),
            email: email.map(|e| EmailAddress::new(e).expect("valid email")),
            name: name.map(str::to_owned),
        }
    }

    #[rstest]
    fn no_profile_without_email() {
        assert!(identity(None, Some("Ada")).provisional_profile().is_none());
    }

    #[rstest]
    #[case(Some("Ada"), "Ada")]
    #[case(Some(" "), "ada")]
    #[case(None, "ada")]
    fn profile_name_falls_back_to_local_part(#[case] name: Option<&str>, #[case] expected: &str) {
        let profile = identity(Some("ada@example.com"), name)
            .provisional_profile()
            .expect("profile");
        assert_eq!(profile.display_name.as_ref(), expected);
        assert_eq!(profile.role, UserRole::Contributor);
    }
}
