use crate::JsonValue;
use std::borrow::Cow;

/// Extension trait for [`serde_json::Value`].
pub trait JsonValueExt {
    /// Returns `true` if the JSON value can be ignored.
    fn is_ignorable(&self) -> bool;

    /// Parses the JSON value as `Cow<'_, str>`.
    /// If the value is ignorable, it returns `None`.
    fn parse_string(&self) -> Option<Cow<'_, str>>;
}

impl JsonValueExt for JsonValue {
    #[inline]
    fn is_ignorable(&self) -> bool {
        match self {
            JsonValue::Null => true,
            JsonValue::String(s) => s.is_empty(),
            JsonValue::Array(vec) => vec.is_empty(),
            JsonValue::Object(map) => map.is_empty(),
            _ => false,
        }
    }

    #[inline]
    fn parse_string(&self) -> Option<Cow<'_, str>> {
        if self.is_ignorable() {
            return None;
        }
        self.as_str()
            .map(Cow::Borrowed)
            .or_else(|| Some(self.to_string().into()))
    }
}
