//! Pattern catalogue entries.
//!
//! Definitions are seeded in bulk and never mutated here; the review
//! workflow only needs their identifiers to validate submissions and to tag
//! credit provenance.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Maximum accepted length for a pattern code.
pub const PATTERN_ID_MAX: usize = 32;

/// Validation errors for [`PatternId`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PatternIdValidationError {
    #[error("pattern id must not be empty")]
    Empty,
    #[error("pattern id must be at most {max} characters")]
    TooLong { max: usize },
    #[error("pattern id may only contain ASCII letters, digits, '-' or '_'")]
    InvalidCharacters,
}

/// Stable external pattern code, such as `CP-001`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PatternId(String);

impl PatternId {
    /// Validate and construct a [`PatternId`].
    ///
    /// # Examples
    /// ```
    /// use patternhub::domain::PatternId;
    ///
    /// let id = PatternId::new("CP-001").expect("valid code");
    /// assert_eq!(id.as_ref(), "CP-001");
    /// assert!(PatternId::new("CP 001").is_err());
    /// ```
    pub fn new(id: impl Into<String>) -> Result<Self, PatternIdValidationError> {
        let id = id.into();
        let trimmed = id.trim();
        if trimmed.is_empty() {
            return Err(PatternIdValidationError::Empty);
        }
        if trimmed.len() > PATTERN_ID_MAX {
            return Err(PatternIdValidationError::TooLong {
                max: PATTERN_ID_MAX,
            });
        }
        if !trimmed
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return Err(PatternIdValidationError::InvalidCharacters);
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for PatternId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PatternId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<PatternId> for String {
    fn from(value: PatternId) -> Self {
        value.0
    }
}

impl TryFrom<String> for PatternId {
    type Error = PatternIdValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Immutable catalogue record describing a reusable problem/solution pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternDefinition {
    pub id: PatternId,
    pub category: String,
    pub title: String,
    pub problem: String,
    pub usage: String,
}
