//! Error types raised while building parser mappings and decoding payloads.

use serde_json::Value;
use thiserror::Error;

/// A field declaration that cannot be turned into a parser.
///
/// Raised once, when a model's [`ParserMapping`](super::ParserMapping) is
/// first built, never while decoding an individual payload.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{model}.{field}: unsupported field type {ty} ({reason})")]
pub struct SchemaError {
    /// Model whose declaration was rejected
    pub model: &'static str,
    /// Offending field
    pub field: &'static str,
    /// Rendered field type
    pub ty: String,
    /// Why the type was rejected
    pub reason: &'static str,
}

/// Type-shape rejection reported by [`resolve_parser`](super::resolve_parser).
///
/// Carries no model context; the mapping builder attaches it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unsupported field type {ty} ({reason})")]
pub struct UnsupportedType {
    /// Rendered field type
    pub ty: String,
    /// Why the type was rejected
    pub reason: &'static str,
}

impl UnsupportedType {
    pub(crate) fn into_schema_error(self, model: &'static str, field: &'static str) -> SchemaError {
        SchemaError {
            model,
            field,
            ty: self.ty,
            reason: self.reason,
        }
    }
}

/// A single raw value that could not be converted to its declared type.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    /// The JSON value has the wrong shape entirely
    #[error("expected {expected}, found {found}")]
    Mismatch {
        /// Declared type
        expected: &'static str,
        /// JSON kind that was received
        found: &'static str,
    },

    /// The JSON value has the right shape but unreadable content
    #[error("invalid {expected}: {value}")]
    Invalid {
        /// Declared type
        expected: &'static str,
        /// Offending raw value
        value: String,
    },

    /// A required (non-optional) value was null or missing
    #[error("required value is null or missing")]
    Null,

    /// A list element failed to convert
    #[error("element {index}: {source}")]
    Element {
        /// Position within the list
        index: usize,
        /// Underlying failure
        source: Box<ParseError>,
    },

    /// A nested model failed to decode
    #[error(transparent)]
    Nested(Box<DeserializeError>),

    /// The nested model's parser mapping could not be built
    #[error(transparent)]
    Schema(SchemaError),
}

impl ParseError {
    pub(crate) fn mismatch(expected: &'static str, found: &Value) -> Self {
        ParseError::Mismatch {
            expected,
            found: json_kind(found),
        }
    }

    pub(crate) fn invalid(expected: &'static str, value: impl ToString) -> Self {
        ParseError::Invalid {
            expected,
            value: value.to_string(),
        }
    }
}

/// A payload that does not match a model's declared field types.
///
/// Distinguishes a malformed upstream payload from an API-level business
/// error (see [`ApiError`](crate::error::ApiError)).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DeserializeError {
    /// The payload for a model was not a JSON object
    #[error("{model}: expected a JSON object, found {found}")]
    NotAnObject {
        /// Model being decoded
        model: &'static str,
        /// JSON kind that was received
        found: &'static str,
    },

    /// One field failed to convert
    #[error("{model}.{field}: {source}")]
    Field {
        /// Model being decoded
        model: &'static str,
        /// Wire name of the field
        field: &'static str,
        /// Underlying failure
        source: ParseError,
    },
}

impl DeserializeError {
    /// Wire name of the failing field, if the failure is field-scoped.
    pub fn field(&self) -> Option<&'static str> {
        match self {
            DeserializeError::Field { field, .. } => Some(field),
            DeserializeError::NotAnObject { .. } => None,
        }
    }
}

/// Short name of a JSON value's kind, for error messages.
pub(crate) fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_field_error_message() {
        let err = DeserializeError::Field {
            model: "Quote",
            field: "t",
            source: ParseError::invalid("datetime", "yesterday"),
        };
        assert_eq!(err.to_string(), "Quote.t: invalid datetime: yesterday");
        assert_eq!(err.field(), Some("t"));
    }

    #[test]
    fn test_json_kind() {
        assert_eq!(json_kind(&json!(null)), "null");
        assert_eq!(json_kind(&json!([1])), "array");
        assert_eq!(json_kind(&json!({"a": 1})), "object");
    }
}
