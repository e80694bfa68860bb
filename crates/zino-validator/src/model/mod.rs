//! Access to the fields of the model under validation.
use crate::{Map, SharedString, extension::JsonObjectExt};
use std::borrow::Cow;

/// Read access to the named fields of a model.
///
/// Validation rules depend on this trait instead of reflecting over the model,
/// so any record type can be validated once it exposes its fields by name.
pub trait AttributeAccess {
    /// Returns the current value of the field as a string,
    /// or `None` if the field is absent or null.
    fn attribute_value(&self, name: &str) -> Option<Cow<'_, str>>;

    /// Returns the human-readable label of the field.
    /// It is only used as a substitution in error messages.
    #[inline]
    fn attribute_label(&self, name: &str) -> SharedString {
        name.to_owned().into()
    }
}

impl AttributeAccess for Map {
    #[inline]
    fn attribute_value(&self, name: &str) -> Option<Cow<'_, str>> {
        self.parse_string(name)
    }
}

impl<T: AttributeAccess + ?Sized> AttributeAccess for &T {
    #[inline]
    fn attribute_value(&self, name: &str) -> Option<Cow<'_, str>> {
        (**self).attribute_value(name)
    }

    #[inline]
    fn attribute_label(&self, name: &str) -> SharedString {
        (**self).attribute_label(name)
    }
}

#[cfg(test)]
mod tests {
    use super::AttributeAccess;
    use crate::{Map, extension::JsonObjectExt};

    #[test]
    fn it_reads_json_attributes() {
        let mut map = Map::new();
        map.upsert("start_date", "01.01.2020");
        map.upsert("end_date", serde_json::Value::Null);
        map.upsert("created_at", 1_700_000_000);

        assert_eq!(map.attribute_value("start_date").as_deref(), Some("01.01.2020"));
        assert_eq!(map.attribute_value("end_date"), None);
        assert_eq!(map.attribute_value("deadline"), None);
        assert_eq!(map.attribute_value("created_at").as_deref(), Some("1700000000"));
        assert_eq!(map.attribute_label("start_date"), "start_date");
    }
}
