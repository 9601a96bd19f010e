//! Raw header value input.
//!
//! A header can be set from a single string or from an ordered sequence of
//! strings. [`HeaderValues`] captures both shapes so the store only ever deals
//! with a list.

use serde_json::Value;
use tracing::debug;

use crate::protocol::MessageError;

/// Characters stripped from both ends of header names and values.
const TRIM_CHARS: [char; 6] = [' ', '\t', '\n', '\r', '\0', '\x0B'];

/// Trims leading and trailing whitespace, leaving inner whitespace alone.
#[inline]
pub(crate) fn trim(s: &str) -> &str {
    s.trim_matches(TRIM_CHARS)
}

/// An ordered list of raw header values, not yet trimmed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderValues(Vec<String>);

impl HeaderValues {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Consumes the list and returns every value trimmed.
    pub(crate) fn into_trimmed(self) -> Vec<String> {
        self.0
            .into_iter()
            .map(|value| {
                let trimmed = trim(&value);
                if trimmed.len() == value.len() { value } else { trimmed.to_owned() }
            })
            .collect()
    }
}

impl From<&str> for HeaderValues {
    fn from(value: &str) -> Self {
        Self(vec![value.to_owned()])
    }
}

impl From<String> for HeaderValues {
    fn from(value: String) -> Self {
        Self(vec![value])
    }
}

impl From<&String> for HeaderValues {
    fn from(value: &String) -> Self {
        Self(vec![value.clone()])
    }
}

impl From<Vec<String>> for HeaderValues {
    fn from(values: Vec<String>) -> Self {
        Self(values)
    }
}

impl From<Vec<&str>> for HeaderValues {
    fn from(values: Vec<&str>) -> Self {
        values.as_slice().into()
    }
}

impl From<&[String]> for HeaderValues {
    fn from(values: &[String]) -> Self {
        Self(values.to_vec())
    }
}

impl From<&Vec<String>> for HeaderValues {
    fn from(values: &Vec<String>) -> Self {
        values.as_slice().into()
    }
}

impl From<&[&str]> for HeaderValues {
    fn from(values: &[&str]) -> Self {
        Self(values.iter().map(|&v| v.to_owned()).collect())
    }
}

impl<const N: usize> From<[&str; N]> for HeaderValues {
    fn from(values: [&str; N]) -> Self {
        values.as_slice().into()
    }
}

/// Accepts a JSON string or an array of JSON strings.
///
/// Anything else (numbers, objects, arrays holding non-strings) is rejected
/// with [`MessageError::InvalidArgument`].
impl TryFrom<&Value> for HeaderValues {
    type Error = MessageError;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        match value {
            Value::String(s) => Ok(s.into()),
            Value::Array(items) => items
                .iter()
                .map(|item| match item {
                    Value::String(s) => Ok(s.clone()),
                    other => Err(invalid_value(other)),
                })
                .collect::<Result<Vec<_>, _>>()
                .map(Self),
            other => Err(invalid_value(other)),
        }
    }
}

fn invalid_value(value: &Value) -> MessageError {
    debug!(%value, "rejected raw header value");
    MessageError::invalid_argument(format!("header value must be a string or a list of strings, got {value}"))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn trim_only_strips_the_edges() {
        assert_eq!(trim("  a  b \t"), "a  b");
        assert_eq!(trim("\r\n\0\x0Bv\n"), "v");
        assert_eq!(trim("v"), "v");
        assert_eq!(trim(trim("  v  ")), "v");
    }

    #[test]
    fn into_trimmed() {
        let values = HeaderValues::from(["  a ", "b", "\tc"]);
        assert_eq!(values.into_trimmed(), vec!["a", "b", "c"]);
    }

    #[test]
    fn from_json() {
        assert_eq!(HeaderValues::try_from(&json!("x")).unwrap().as_slice(), ["x"]);
        assert_eq!(HeaderValues::try_from(&json!(["a", "b"])).unwrap().as_slice(), ["a", "b"]);
        assert!(HeaderValues::try_from(&json!([])).unwrap().is_empty());
    }

    #[test]
    fn from_json_rejects_other_shapes() {
        for value in [json!(1), json!(null), json!({"a": "b"}), json!(["a", 2])] {
            let err = HeaderValues::try_from(&value).unwrap_err();
            assert!(matches!(err, MessageError::InvalidArgument { .. }));
        }
    }
}
