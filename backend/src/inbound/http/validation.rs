//! Shared validation helpers for inbound HTTP adapters.

use serde_json::json;
use uuid::Uuid;

use crate::domain::{
    ContributionValidationError, Error, PatternId, QUALITY_SCORE_MAX, QUALITY_SCORE_MIN,
    QualityScore,
};

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    MissingField,
    InvalidUuid,
    InvalidPatternId,
    OutOfRange,
    EmptyValue,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            ErrorCode::MissingField => "missing_field",
            ErrorCode::InvalidUuid => "invalid_uuid",
            ErrorCode::InvalidPatternId => "invalid_pattern_id",
            ErrorCode::OutOfRange => "out_of_range",
            ErrorCode::EmptyValue => "empty_value",
        }
    }
}

/// Newtype wrapper for HTTP field names to provide type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    fn as_str(&self) -> &str {
        self.0
    }
}

/// Builder for validation errors with field context.
struct ValidationError {
    field: String,
    message: String,
}

impl ValidationError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }

    fn with_code(self, code: ErrorCode) -> Error {
        Error::invalid_request(self.message).with_details(json!({
            "field": self.field,
            "code": code.as_str(),
        }))
    }

    fn with_value(self, code: ErrorCode, value: impl Into<serde_json::Value>) -> Error {
        Error::invalid_request(self.message).with_details(json!({
            "field": self.field,
            "value": value.into(),
            "code": code.as_str(),
        }))
    }
}

pub(crate) fn missing_field_error(field: FieldName) -> Error {
    let field = field.as_str();
    ValidationError::new(field, format!("missing required field: {field}"))
        .with_code(ErrorCode::MissingField)
}

pub(crate) fn empty_field_error(field: FieldName) -> Error {
    let field = field.as_str();
    ValidationError::new(field, format!("{field} must not be empty"))
        .with_code(ErrorCode::EmptyValue)
}

pub(crate) fn invalid_uuid_error(field: FieldName, value: &str) -> Error {
    let field = field.as_str();
    ValidationError::new(field, format!("{field} must be a valid UUID"))
        .with_value(ErrorCode::InvalidUuid, value)
}

/// Unwrap a required body field.
pub(crate) fn require<T>(value: Option<T>, field: FieldName) -> Result<T, Error> {
    value.ok_or_else(|| missing_field_error(field))
}

pub(crate) fn parse_uuid(value: String, field: FieldName) -> Result<Uuid, Error> {
    Uuid::parse_str(value.trim()).map_err(|_| invalid_uuid_error(field, &value))
}

pub(crate) fn parse_pattern_id(value: String, field: FieldName) -> Result<PatternId, Error> {
    PatternId::new(value.clone()).map_err(|err| {
        ValidationError::new(field.as_str(), err.to_string())
            .with_value(ErrorCode::InvalidPatternId, value)
    })
}

/// Validate an optional quality score; absent stays absent.
pub(crate) fn parse_quality_score(
    value: Option<i64>,
    field: FieldName,
) -> Result<Option<QualityScore>, Error> {
    value
        .map(|raw| {
            QualityScore::new(raw).map_err(|err: ContributionValidationError| {
                ValidationError::new(field.as_str(), err.to_string()).with_value(
                    ErrorCode::OutOfRange,
                    json!({
                        "given": raw,
                        "min": QUALITY_SCORE_MIN,
                        "max": QUALITY_SCORE_MAX,
                    }),
                )
            })
        })
        .transpose()
}
