//! Conversions between [`HeaderStore`] and other header representations.
//!
//! - `http::HeaderMap`, in both directions. `HeaderMap` only knows lowercase
//!   names, so display spellings are lost when converting into it.
//! - untyped JSON objects, the raw mapping shape `name -> string | [string]`.

use http::header::{HeaderMap, HeaderName, HeaderValue};
use serde_json::Value;
use tracing::debug;

use crate::header::{HeaderStore, HeaderValues};
use crate::protocol::MessageError;

impl TryFrom<&HeaderStore> for HeaderMap {
    type Error = MessageError;

    fn try_from(store: &HeaderStore) -> Result<Self, Self::Error> {
        let mut map = HeaderMap::with_capacity(store.len());
        for (name, values) in store.iter() {
            let header_name = HeaderName::from_bytes(name.as_bytes()).map_err(|e| {
                debug!(header = name, cause = %e, "header name not representable");
                MessageError::invalid_argument(format!("invalid header name {name:?}: {e}"))
            })?;

            for value in values {
                let header_value = HeaderValue::from_str(value).map_err(|e| {
                    debug!(header = name, cause = %e, "header value not representable");
                    MessageError::invalid_argument(format!("invalid value for header {name:?}: {e}"))
                })?;
                map.append(header_name.clone(), header_value);
            }
        }
        Ok(map)
    }
}

impl TryFrom<&HeaderMap> for HeaderStore {
    type Error = MessageError;

    fn try_from(map: &HeaderMap) -> Result<Self, Self::Error> {
        let raw = map
            .iter()
            .map(|(name, value)| {
                value
                    .to_str()
                    .map(|value| (name.as_str(), value))
                    .map_err(|e| MessageError::invalid_argument(format!("invalid value for header {name}: {e}")))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(HeaderStore::from_raw(raw))
    }
}

/// Reads a JSON object of `name -> string | [string]` in key order.
impl TryFrom<&Value> for HeaderStore {
    type Error = MessageError;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        let Value::Object(object) = value else {
            return Err(MessageError::invalid_argument(format!("raw headers must be an object, got {value}")));
        };

        let raw = object
            .iter()
            .map(|(name, value)| {
                HeaderValues::try_from(value)
                    .map(|values| (name.as_str(), values))
                    .map_err(|e| MessageError::invalid_argument(format!("header {name:?}: {e}")))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(HeaderStore::from_raw(raw))
    }
}

#[cfg(test)]
mod tests {
    use indoc::indoc;
    use serde_json::json;

    use super::*;

    #[test]
    fn into_header_map() {
        let store = HeaderStore::new().with_header("Accept", ["text/html", "application/json"]).with_header("Host", "a");
        let map = HeaderMap::try_from(&store).unwrap();

        assert_eq!(map.len(), 3);
        let accept: Vec<_> = map.get_all(http::header::ACCEPT).iter().collect();
        assert_eq!(accept, [&HeaderValue::from_static("text/html"), &HeaderValue::from_static("application/json")]);
        assert_eq!(map.get(http::header::HOST), Some(&HeaderValue::from_static("a")));
    }

    #[test]
    fn into_header_map_rejects_bad_names() {
        let store = HeaderStore::new().with_header("Bad Name", "x");
        let err = HeaderMap::try_from(&store).unwrap_err();
        assert!(matches!(err, MessageError::InvalidArgument { .. }));

        let store = HeaderStore::new().with_header("X-Bad", "line\nbreak");
        assert!(HeaderMap::try_from(&store).is_err());
    }

    #[test]
    fn from_header_map() {
        let mut map = HeaderMap::new();
        map.append(http::header::ACCEPT, HeaderValue::from_static("a"));
        map.append(http::header::HOST, HeaderValue::from_static("example.com"));
        map.append(http::header::ACCEPT, HeaderValue::from_static("b"));

        let store = HeaderStore::try_from(&map).unwrap();
        assert_eq!(store.line("Accept"), "a, b");
        assert_eq!(store.line("Host"), "example.com");
    }

    #[test]
    fn from_header_map_rejects_opaque_values() {
        let mut map = HeaderMap::new();
        map.insert("x-bin", HeaderValue::from_bytes(&[0xff, 0xfe]).unwrap());

        let err = HeaderStore::try_from(&map).unwrap_err();
        assert!(matches!(err, MessageError::InvalidArgument { .. }));
    }

    #[test]
    fn from_json_object() {
        let raw: Value = serde_json::from_str(indoc! {r#"
            {
                "Content-Type": " text/plain ",
                "X-Foo": ["a", "b"],
                "Accept": []
            }
        "#})
        .unwrap();

        let store = HeaderStore::try_from(&raw).unwrap();
        assert_eq!(store.line("content-type"), "text/plain");
        assert_eq!(store.line("X-FOO"), "a, b");
        assert!(store.has("accept"));
        assert_eq!(store.names().collect::<Vec<_>>(), ["Content-Type", "X-Foo", "Accept"]);
    }

    #[test]
    fn from_json_rejects_bad_shapes() {
        assert!(HeaderStore::try_from(&json!(["X-Foo", "a"])).is_err());

        let err = HeaderStore::try_from(&json!({"X-Foo": "a", "X-Count": 3})).unwrap_err();
        assert!(err.to_string().contains("X-Count"));
    }
}
