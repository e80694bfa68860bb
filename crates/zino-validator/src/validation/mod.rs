//! Date comparison rules and the record of validation results.
use crate::{Map, SharedString, datetime::DateFormat, extension::JsonObjectExt};
use smallvec::SmallVec;
use std::fmt;

mod operator;
mod outcome;
mod rule;
mod validator;

pub use operator::CompareOperator;
pub use outcome::{ComparisonOutcome, MessageKey, ReportedField, Violation};
pub use rule::{CompareTarget, DateCompareRule, RuleConfig};
pub use validator::{DateFormatValidator, Validator};

/// A record of validation results.
#[derive(Debug, Default)]
pub struct Validation {
    failed_entries: SmallVec<[(SharedString, Violation); 4]>,
}

impl Validation {
    /// Creates a new instance.
    #[inline]
    pub fn new() -> Self {
        Self {
            failed_entries: SmallVec::new(),
        }
    }

    /// Records a violation for the field.
    #[inline]
    pub fn record_violation(&mut self, key: impl Into<SharedString>, violation: Violation) {
        let key = key.into();
        tracing::debug!(field = %key, violation = %violation, "violation recorded");
        self.failed_entries.push((key, violation));
    }

    /// Validates the string value with a specific date format.
    pub fn validate_date(&mut self, key: impl Into<SharedString>, value: &str, format: &DateFormat) {
        if let Err(err) = DateFormatValidator(format).validate(value) {
            let key = key.into();
            tracing::debug!(format = format.pattern(), "invalid date for `{key}`: {err}");
            let violation =
                Violation::new(MessageKey::InvalidSubjectDateFormat).with_param("value", value);
            self.record_violation(key, violation);
        }
    }

    /// Returns true if the validation contains a value for the specified key.
    #[inline]
    pub fn contains_key(&self, key: &str) -> bool {
        self.failed_entries.iter().any(|(field, _)| field == key)
    }

    /// Returns the first violation recorded for the key.
    #[inline]
    pub fn get(&self, key: &str) -> Option<&Violation> {
        self.failed_entries
            .iter()
            .find_map(|(field, violation)| (field == key).then_some(violation))
    }

    /// Returns `true` if the validation is success.
    #[inline]
    pub fn is_success(&self) -> bool {
        self.failed_entries.is_empty()
    }

    /// Returns a list of invalid params.
    #[inline]
    pub fn invalid_params(&self) -> Vec<&str> {
        self.failed_entries
            .iter()
            .map(|entry| entry.0.as_ref())
            .collect()
    }

    /// Consumes the validation and returns as a json object.
    #[must_use]
    pub fn into_map(self) -> Map {
        let mut map = Map::with_capacity(self.failed_entries.len());
        for (key, violation) in self.failed_entries {
            tracing::warn!("invalid value for `{key}`: {violation}");
            match serde_json::to_value(&violation) {
                Ok(value) => {
                    map.upsert(key, value);
                }
                Err(err) => tracing::error!("fail to serialize the violation for `{key}`: {err}"),
            }
        }
        map
    }
}

impl fmt::Display for Validation {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let failed_entries = &self.failed_entries;
        let mut errors = Vec::with_capacity(failed_entries.len());
        for (key, violation) in failed_entries {
            errors.push(format!("invalid value for `{key}`: {violation}"));
        }
        write!(f, "{}", errors.join(","))
    }
}
