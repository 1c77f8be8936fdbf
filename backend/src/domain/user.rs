//! User data model.
//!
//! Users are keyed internally by [`UserId`] and linked to the identity
//! provider through [`IdentityId`]. The provider owns the account; this
//! service only mirrors the fields it needs for attribution and
//! authorization.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Maximum accepted display name length, in characters.
pub const DISPLAY_NAME_MAX: usize = 128;

/// Validation errors returned by the user value constructors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserValidationError {
    #[error("user id must be a valid UUID")]
    InvalidId,
    #[error("identity id must not be empty")]
    EmptyIdentityId,
    #[error("email address must not be empty")]
    EmptyEmail,
    #[error("email address must contain a local part and a domain")]
    InvalidEmail,
    #[error("display name must not be empty")]
    EmptyDisplayName,
    #[error("display name must be at most {max} characters")]
    DisplayNameTooLong { max: usize },
    #[error("unknown user role: {value}")]
    UnknownRole { value: String },
}

/// Internal user identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(Uuid);

impl UserId {
    /// Parse a [`UserId`] from its textual UUID form.
    pub fn new(id: impl AsRef<str>) -> Result<Self, UserValidationError> {
        Uuid::parse_str(id.as_ref())
            .map(Self)
            .map_err(|_| UserValidationError::InvalidId)
    }

    /// Wrap an existing UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Generate a new random [`UserId`].
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier issued by the external identity provider (for example
/// `user_2abc`). Unique per user.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct IdentityId(String);

impl IdentityId {
    /// Validate and construct an [`IdentityId`].
    pub fn new(id: impl Into<String>) -> Result<Self, UserValidationError> {
        let id = id.into();
        let trimmed = id.trim();
        if trimmed.is_empty() {
            return Err(UserValidationError::EmptyIdentityId);
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for IdentityId {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for IdentityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<IdentityId> for String {
    fn from(value: IdentityId) -> Self {
        value.0
    }
}

impl TryFrom<String> for IdentityId {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Email address as supplied by the identity provider.
///
/// Only the shape `local@domain` is checked; deliverability is the
/// provider's concern.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Validate and construct an [`EmailAddress`].
    pub fn new(email: impl Into<String>) -> Result<Self, UserValidationError> {
        let email = email.into();
        let trimmed = email.trim();
        if trimmed.is_empty() {
            return Err(UserValidationError::EmptyEmail);
        }
        match trimmed.split_once('@') {
            Some((local, domain)) if !local.is_empty() && !domain.is_empty() => {
                Ok(Self(trimmed.to_owned()))
            }
            _ => Err(UserValidationError::InvalidEmail),
        }
    }

    /// The part before the `@`.
    pub fn local_part(&self) -> &str {
        self.0.split_once('@').map_or(self.0.as_str(), |(local, _)| local)
    }
}

impl AsRef<str> for EmailAddress {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<EmailAddress> for String {
    fn from(value: EmailAddress) -> Self {
        value.0
    }
}

impl TryFrom<String> for EmailAddress {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Human readable display name for the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DisplayName(String);

impl DisplayName {
    /// Validate and construct a [`DisplayName`]; surrounding whitespace is
    /// stripped.
    pub fn new(display_name: impl Into<String>) -> Result<Self, UserValidationError> {
        let display_name = display_name.into();
        let trimmed = display_name.trim();
        if trimmed.is_empty() {
            return Err(UserValidationError::EmptyDisplayName);
        }
        if trimmed.chars().count() > DISPLAY_NAME_MAX {
            return Err(UserValidationError::DisplayNameTooLong {
                max: DISPLAY_NAME_MAX,
            });
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for DisplayName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for DisplayName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<DisplayName> for String {
    fn from(value: DisplayName) -> Self {
        value.0
    }
}

impl TryFrom<String> for DisplayName {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Closed set of account roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Guest,
    #[default]
    Contributor,
    Premier,
    Admin,
}

impl UserRole {
    /// Stable storage and wire representation.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Guest => "guest",
            Self::Contributor => "contributor",
            Self::Premier => "premier",
            Self::Admin => "admin",
        }
    }

    /// Whether the role may review contributions.
    pub fn is_admin(self) -> bool {
        matches!(self, Self::Admin)
    }

    /// Whether the role may submit implementations.
    pub fn can_contribute(self) -> bool {
        !matches!(self, Self::Guest)
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserRole {
    type Err = UserValidationError;

    /// Parse case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "guest" => Ok(Self::Guest),
            "contributor" => Ok(Self::Contributor),
            "premier" => Ok(Self::Premier),
            "admin" => Ok(Self::Admin),
            _ => Err(UserValidationError::UnknownRole {
                value: s.to_owned(),
            }),
        }
    }
}

/// Local mirror of an identity-provider account.
///
/// ## Invariants
/// - `identity_id` and `email` are unique across stored users.
/// - `deleted_at` is only ever set by the soft-delete policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub identity_id: IdentityId,
    pub email: EmailAddress,
    pub display_name: DisplayName,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl User {
    /// Whether the row has been soft-deleted.
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }
}

/// Account fields derived from an identity event or token claims.
///
/// Carries everything needed to insert or refresh a [`User`]; the storage
/// identifiers and timestamps are assigned by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserProfile {
    pub identity_id: IdentityId,
    pub email: EmailAddress,
    pub display_name: DisplayName,
    pub role: UserRole,
}

impl UserProfile {
    /// Materialise a fresh [`User`] created at `now`.
    pub fn into_new_user(self, now: DateTime<Utc>) -> User {
        User {
            id: UserId::random(),
            identity_id: self.identity_id,
            email: self.email,
            display_name: self.display_name,
            role: self.role,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("Admin", UserRole::Admin)]
    #[case("premier", UserRole::Premier)]
    #[case(" GUEST ", UserRole::Guest)]
    #[case("contributor", UserRole::Contributor)]
    fn roles_parse_case_insensitively(#[case] raw: &str, #[case] expected: UserRole) {
        assert_eq!(raw.parse::<UserRole>().expect("known role"), expected);
    }

    #[rstest]
    fn unknown_roles_are_rejected() {
        let err = "owner".parse::<UserRole>().expect_err("unknown role");
        assert_eq!(
            err,
            UserValidationError::UnknownRole {
                value: "owner".to_owned()
            }
        );
    }

    #[rstest]
    fn default_role_is_contributor() {
        assert_eq!(UserRole::default(), UserRole::Contributor);
    }

    #[rstest]
    #[case("ada@example.com", true)]
    #[case("@example.com", false)]
    #[case("ada@", false)]
    #[case("ada", false)]
    #[case("   ", false)]
    fn email_requires_local_part_and_domain(#[case] raw: &str, #[case] valid: bool) {
        assert_eq!(EmailAddress::new(raw).is_ok(), valid);
    }

    #[rstest]
    fn email_local_part_precedes_at_sign() {
        let email = EmailAddress::new("grace.hopper@example.com").expect("valid email");
        assert_eq!(email.local_part(), "grace.hopper");
    }

    #[rstest]
    fn display_name_is_trimmed() {
        let name = DisplayName::new("  Ada  ").expect("valid name");
        assert_eq!(name.as_ref(), "Ada");
    }

    #[rstest]
    fn display_name_rejects_overlong_values() {
        let err = DisplayName::new("x".repeat(DISPLAY_NAME_MAX + 1)).expect_err("too long");
        assert_eq!(
            err,
            UserValidationError::DisplayNameTooLong {
                max: DISPLAY_NAME_MAX
            }
        );
    }

    #[rstest]
    fn identity_id_rejects_blank_values() {
        assert_eq!(
            IdentityId::new("  "),
            Err(UserValidationError::EmptyIdentityId)
        );
    }

    #[rstest]
    fn contribution_rights_exclude_guests() {
        assert!(!UserRole::Guest.can_contribute());
        assert!(UserRole::Contributor.can_contribute());
        assert!(UserRole::Admin.is_admin());
        assert!(!UserRole::Premier.is_admin());
    }
}
