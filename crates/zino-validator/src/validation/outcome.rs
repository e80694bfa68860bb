use crate::{Map, SharedString, extension::JsonObjectExt};
use serde::ser::{Serialize, SerializeMap, Serializer};
use smallvec::SmallVec;
use std::fmt;

/// Identifier of the message template for a failed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum MessageKey {
    /// The value being validated does not match the date format.
    InvalidSubjectDateFormat,
    /// The comparison target does not match the date format.
    InvalidCompareDateFormat,
    /// The value must be equal to the target.
    MustBeEqual,
    /// The value must not be equal to the target.
    MustNotEqual,
    /// The value must be greater than the target.
    MustBeGreater,
    /// The value must be greater than or equal to the target.
    MustBeGreaterOrEqual,
    /// The value must be less than the target.
    MustBeLess,
    /// The value must be less than or equal to the target.
    MustBeLessOrEqual,
}

impl MessageKey {
    /// Returns the key as a str.
    #[inline]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InvalidSubjectDateFormat => "invalid-subject-date-format",
            Self::InvalidCompareDateFormat => "invalid-compare-date-format",
            Self::MustBeEqual => "must-be-equal",
            Self::MustNotEqual => "must-not-equal",
            Self::MustBeGreater => "must-be-greater",
            Self::MustBeGreaterOrEqual => "must-be-greater-or-equal",
            Self::MustBeLess => "must-be-less",
            Self::MustBeLessOrEqual => "must-be-less-or-equal",
        }
    }
}

impl fmt::Display for MessageKey {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The field a violation is reported against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportedField {
    /// The field being validated.
    Subject,
    /// A sibling field used as the comparison target.
    Attribute(SharedString),
}

/// A failed validation: a message key or an override message,
/// together with the placeholder substitutions for rendering it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// Reported field.
    field: ReportedField,
    /// Message key.
    key: MessageKey,
    /// Message overriding the keyed template.
    message: Option<SharedString>,
    /// Placeholder substitutions.
    params: SmallVec<[(SharedString, String); 2]>,
}

impl Violation {
    /// Creates a new instance reported against the subject field.
    #[inline]
    pub fn new(key: MessageKey) -> Self {
        Self {
            field: ReportedField::Subject,
            key,
            message: None,
            params: SmallVec::new(),
        }
    }

    /// Sets the field which the violation is reported against.
    #[inline]
    pub fn with_field(mut self, field: ReportedField) -> Self {
        self.field = field;
        self
    }

    /// Sets a message which overrides the keyed template.
    #[inline]
    pub fn with_message(mut self, message: impl Into<SharedString>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Adds a placeholder substitution.
    #[inline]
    pub fn with_param(mut self, name: impl Into<SharedString>, value: impl Into<String>) -> Self {
        self.params.push((name.into(), value.into()));
        self
    }

    /// Returns the reported field.
    #[inline]
    pub fn field(&self) -> &ReportedField {
        &self.field
    }

    /// Returns the message key.
    #[inline]
    pub fn key(&self) -> MessageKey {
        self.key
    }

    /// Returns the override message if it has been set, or the message key otherwise.
    #[inline]
    pub fn message(&self) -> &str {
        self.message.as_deref().unwrap_or(self.key.as_str())
    }

    /// Returns `true` if the keyed template has been overridden.
    #[inline]
    pub fn is_overridden(&self) -> bool {
        self.message.is_some()
    }

    /// Returns the substitution for the placeholder.
    #[inline]
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find_map(|(key, value)| (key == name).then_some(value.as_str()))
    }

    /// Returns an iterator over the placeholder substitutions.
    #[inline]
    pub fn params(&self) -> impl Iterator<Item = (&str, &str)> {
        self.params
            .iter()
            .map(|(key, value)| (key.as_ref(), value.as_str()))
    }

    /// Returns the placeholder substitutions as a JSON object.
    pub fn params_map(&self) -> Map {
        let mut map = Map::with_capacity(self.params.len());
        for (key, value) in self.params() {
            map.upsert(key, value);
        }
        map
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())?;
        let params = self
            .params()
            .map(|(key, value)| format!("{key}=\"{value}\""))
            .collect::<Vec<_>>();
        if !params.is_empty() {
            write!(f, " ({})", params.join(", "))?;
        }
        Ok(())
    }
}

impl Serialize for Violation {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        if let ReportedField::Attribute(field) = &self.field {
            map.serialize_entry("field", field)?;
        }
        map.serialize_entry("message", self.message())?;
        map.serialize_entry("params", &self.params_map())?;
        map.end()
    }
}

/// The outcome of evaluating a validation rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ComparisonOutcome {
    /// The value passes the rule.
    Valid,
    /// The value fails the rule.
    Invalid(Violation),
}

impl ComparisonOutcome {
    /// Returns `true` if the value passes the rule.
    #[inline]
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }

    /// Returns the violation if the value fails the rule.
    #[inline]
    pub fn violation(&self) -> Option<&Violation> {
        match self {
            Self::Valid => None,
            Self::Invalid(violation) => Some(violation),
        }
    }

    /// Consumes the outcome and returns the violation if the value fails the rule.
    #[inline]
    pub fn into_violation(self) -> Option<Violation> {
        match self {
            Self::Valid => None,
            Self::Invalid(violation) => Some(violation),
        }
    }

    /// Returns the message key if the value fails the rule.
    #[inline]
    pub fn message_key(&self) -> Option<MessageKey> {
        self.violation().map(|violation| violation.key())
    }
}

#[cfg(test)]
mod tests {
    use super::{ComparisonOutcome, MessageKey, ReportedField, Violation};
    use serde_json::json;

    #[test]
    fn it_serializes_violations() {
        let violation = Violation::new(MessageKey::InvalidCompareDateFormat)
            .with_field(ReportedField::Attribute("start_date".into()))
            .with_param("value", "2020-01-01");
        assert_eq!(
            serde_json::to_value(&violation).unwrap(),
            json!({
                "field": "start_date",
                "message": "invalid-compare-date-format",
                "params": { "value": "2020-01-01" },
            })
        );

        let violation = Violation::new(MessageKey::MustBeLess)
            .with_message("{attribute} must be before the deadline.")
            .with_param("compareTarget", "Deadline")
            .with_param("compareValue", "31.12.2024");
        assert!(violation.is_overridden());
        assert_eq!(violation.key(), MessageKey::MustBeLess);
        assert_eq!(violation.param("compareTarget"), Some("Deadline"));
        assert_eq!(
            violation.to_string(),
            "{attribute} must be before the deadline. \
             (compareTarget=\"Deadline\", compareValue=\"31.12.2024\")"
        );
    }

    #[test]
    fn it_inspects_outcomes() {
        assert!(ComparisonOutcome::Valid.is_valid());
        assert_eq!(ComparisonOutcome::Valid.message_key(), None);

        let outcome = ComparisonOutcome::Invalid(Violation::new(MessageKey::MustBeEqual));
        assert!(!outcome.is_valid());
        assert_eq!(outcome.message_key(), Some(MessageKey::MustBeEqual));
        assert_eq!(
            outcome.message_key().map(|key| key.to_string()).as_deref(),
            Some("must-be-equal")
        );

        let violation = outcome.into_violation().unwrap();
        assert_eq!(violation.message(), "must-be-equal");
        assert_eq!(violation.params().count(), 0);
    }
}
