use super::JsonValueExt;
use crate::{JsonValue, Map};
use std::borrow::Cow;

/// Extension trait for [`Map`](crate::Map).
pub trait JsonObjectExt {
    /// Extracts the string corresponding to the key.
    fn get_str(&self, key: &str) -> Option<&str>;

    /// Extracts the value corresponding to the key and parses it as `Cow<'_, str>`.
    fn parse_string(&self, key: &str) -> Option<Cow<'_, str>>;

    /// Inserts or updates a key/value pair into the map.
    /// If the map did have this key present, the value is updated and the old value is returned,
    /// otherwise `None` is returned.
    fn upsert(&mut self, key: impl Into<String>, value: impl Into<JsonValue>) -> Option<JsonValue>;
}

impl JsonObjectExt for Map {
    #[inline]
    fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(|v| v.as_str())
    }

    #[inline]
    fn parse_string(&self, key: &str) -> Option<Cow<'_, str>> {
        self.get(key).and_then(|v| v.parse_string())
    }

    #[inline]
    fn upsert(&mut self, key: impl Into<String>, value: impl Into<JsonValue>) -> Option<JsonValue> {
        self.insert(key.into(), value.into())
    }
}
