//! Shared validation helpers for inbound HTTP adapters.
//!
//! Services validate domain rules; these helpers only cover what the wire
//! format adds: path identifiers, timestamps and coordinates that may arrive
//! as JSON numbers or strings.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde_json::{Value, json};

use crate::domain::Error;

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    InvalidUuid,
    InvalidTimestamp,
    InvalidCoordinate,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            ErrorCode::InvalidUuid => "invalid_uuid",
            ErrorCode::InvalidTimestamp => "invalid_timestamp",
            ErrorCode::InvalidCoordinate => "invalid_coordinate",
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

    fn as_str(&self) -> &'static str {
        self.0
    }
}

fn invalid_value(field: FieldName, message: String, code: ErrorCode, value: &str) -> Error {
    Error::invalid_request(message).with_details(json!({
        "field": field.as_str(),
        "value": value,
        "code": code.as_str(),
    }))
}

/// Parse a UUID-backed identifier from a path segment.
pub(crate) fn parse_id<T>(value: &str, field: FieldName) -> Result<T, Error>
where
    T: FromStr,
{
    T::from_str(value).map_err(|_| {
        invalid_value(
            field,
            format!("{} must be a valid UUID", field.as_str()),
            ErrorCode::InvalidUuid,
            value,
        )
    })
}

pub(crate) fn parse_optional_rfc3339_timestamp(
    value: Option<String>,
    field: FieldName,
) -> Result<Option<DateTime<Utc>>, Error> {
    value
        .map(|raw| {
            DateTime::parse_from_rfc3339(&raw)
                .map(|timestamp| timestamp.with_timezone(&Utc))
                .map_err(|_| {
                    invalid_value(
                        field,
                        format!("{} must be an RFC 3339 timestamp", field.as_str()),
                        ErrorCode::InvalidTimestamp,
                        &raw,
                    )
                })
        })
        .transpose()
}

/// Text of a coordinate sent as either a JSON number or a string.
///
/// Numbers are rendered by `serde_json`, so `47.60` arrives as `"47.6"`.
/// Clients that care about the exact text send strings.
pub(crate) fn coordinate_text(
    value: Option<Value>,
    field: FieldName,
) -> Result<Option<String>, Error> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(number)) => Ok(Some(number.to_string())),
        Some(Value::String(text)) => Ok(Some(text)),
        Some(other) => Err(invalid_value(
            field,
            format!("{} must be a number or a numeric string", field.as_str()),
            ErrorCode::InvalidCoordinate,
            &other.to_string(),
        )),
    }
}
