//! Canonical row identifiers.
//!
//! Table rows arrive with integer ids from some endpoints and string ids
//! from others. Everything is converted to a [`RowId`] once at the boundary
//! so the rest of the crate never compares `5` with `"5"`.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{Result, SelectionError};

/// An opaque row identifier, always held as a string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RowId(String);

impl RowId {
    /// Parse a row id from text. Surrounding whitespace is trimmed; an empty
    /// result is rejected.
    pub fn parse(raw: &str) -> Result<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(SelectionError::InvalidIdentifier(format!(
                "empty identifier {:?}",
                raw
            )));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Convert a JSON value into a row id.
    ///
    /// Strings and integers are accepted. Null, booleans, floats, arrays and
    /// objects are rejected rather than coerced.
    pub fn from_json(value: &serde_json::Value) -> Result<Self> {
        match value {
            serde_json::Value::String(s) => Self::parse(s),
            serde_json::Value::Number(n) if n.is_i64() || n.is_u64() => Ok(Self(n.to_string())),
            other => Err(SelectionError::InvalidIdentifier(format!(
                "expected string or integer id, got {}",
                other
            ))),
        }
    }

    /// Convert a JSON array of ids, failing on the first bad entry.
    pub fn from_json_list(values: &[serde_json::Value]) -> Result<Vec<Self>> {
        values.iter().map(Self::from_json).collect()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<u64> for RowId {
    fn from(n: u64) -> Self {
        Self(n.to_string())
    }
}

impl From<u32> for RowId {
    fn from(n: u32) -> Self {
        Self(n.to_string())
    }
}

impl From<i64> for RowId {
    fn from(n: i64) -> Self {
        Self(n.to_string())
    }
}

impl From<i32> for RowId {
    fn from(n: i32) -> Self {
        Self(n.to_string())
    }
}

impl AsRef<str> for RowId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case("42", "42")]
    #[case("  42 ", "42")]
    #[case("abc-1", "abc-1")]
    fn parse_trims(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(RowId::parse(input).unwrap().as_str(), expected);
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    fn parse_rejects_blank(#[case] input: &str) {
        assert!(matches!(
            RowId::parse(input),
            Err(SelectionError::InvalidIdentifier(_))
        ));
    }

    #[test]
    fn integer_and_string_ids_agree() {
        assert_eq!(RowId::from(55u64), RowId::parse("55").unwrap());
        assert_eq!(RowId::from_json(&json!(55)).unwrap(), RowId::from_json(&json!("55")).unwrap());
    }

    #[rstest]
    #[case(json!(null))]
    #[case(json!(true))]
    #[case(json!(1.5))]
    #[case(json!({"id": 1}))]
    #[case(json!([1]))]
    fn from_json_rejects_non_ids(#[case] value: serde_json::Value) {
        assert!(RowId::from_json(&value).is_err());
    }

    #[test]
    fn serializes_as_plain_string() {
        let id = RowId::from(101u64);
        assert_eq!(serde_json::to_value(&id).unwrap(), json!("101"));
    }

    #[test]
    fn list_conversion_stops_at_bad_entry() {
        let values = vec![json!(1), json!(null), json!("3")];
        assert!(RowId::from_json_list(&values).is_err());
    }
}
