use super::{
    CompareOperator, ComparisonOutcome, MessageKey, ReportedField, Validation, Violation,
};
use crate::{
    SharedString, TomlTable,
    datetime::{DEFAULT_DATE_FORMAT, DateFormat},
    error::Error,
    extension::TomlTableExt,
    model::AttributeAccess,
};
use serde::Deserialize;

/// Configuration of a [`DateCompareRule`].
///
/// It can be deserialized from a TOML or JSON table with kebab-case keys:
///
/// ```toml
/// format = "d.m.Y"
/// operator = ">="
/// allow-empty = true
/// compare-attribute = "start_date"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct RuleConfig {
    /// Date format shared by both sides of the comparison.
    format: SharedString,
    /// Comparison operator.
    operator: SharedString,
    /// Whether an empty value passes without comparison.
    allow_empty: bool,
    /// Constant to compare with.
    compare_value: Option<SharedString>,
    /// Name of the sibling field to compare with.
    compare_attribute: Option<SharedString>,
    /// Message overriding the keyed template.
    message: Option<SharedString>,
}

impl RuleConfig {
    /// Creates a new instance which compares with a constant.
    #[inline]
    pub fn with_compare_value(value: impl Into<SharedString>) -> Self {
        Self {
            compare_value: Some(value.into()),
            ..Self::default()
        }
    }

    /// Creates a new instance which compares with a sibling field.
    #[inline]
    pub fn with_compare_attribute(name: impl Into<SharedString>) -> Self {
        Self {
            compare_attribute: Some(name.into()),
            ..Self::default()
        }
    }

    /// Reads the config from a TOML table.
    pub fn from_table(config: &TomlTable) -> Self {
        let mut rule_config = Self::default();
        if let Some(format) = config.get_str("format") {
            rule_config.format = format.to_owned().into();
        }
        if let Some(operator) = config.get_str("operator") {
            rule_config.operator = operator.to_owned().into();
        }
        if let Some(allow_empty) = config.get_bool("allow-empty") {
            rule_config.allow_empty = allow_empty;
        }
        rule_config.compare_value = config
            .get_str("compare-value")
            .map(|value| value.to_owned().into());
        rule_config.compare_attribute = config
            .get_str("compare-attribute")
            .map(|name| name.to_owned().into());
        rule_config.message = config
            .get_str("message")
            .map(|message| message.to_owned().into());
        rule_config
    }

    /// Sets the date format.
    #[inline]
    pub fn with_format(mut self, format: impl Into<SharedString>) -> Self {
        self.format = format.into();
        self
    }

    /// Sets the comparison operator.
    /// Unknown operators are only rejected when the rule is evaluated.
    #[inline]
    pub fn with_operator(mut self, operator: impl Into<SharedString>) -> Self {
        self.operator = operator.into();
        self
    }

    /// Sets a message which overrides the keyed template.
    #[inline]
    pub fn with_message(mut self, message: impl Into<SharedString>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Sets whether an empty value passes without comparison.
    #[inline]
    pub fn allow_empty(mut self, allow_empty: bool) -> Self {
        self.allow_empty = allow_empty;
        self
    }
}

impl Default for RuleConfig {
    #[inline]
    fn default() -> Self {
        Self {
            format: DEFAULT_DATE_FORMAT.into(),
            operator: "=".into(),
            allow_empty: false,
            compare_value: None,
            compare_attribute: None,
            message: None,
        }
    }
}

/// The target a value is compared with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompareTarget {
    /// A constant.
    Value(SharedString),
    /// A sibling field.
    Attribute(SharedString),
}

/// A rule which parses two dates with the same format and compares them.
///
/// The rule is immutable once constructed, so one instance can be shared
/// across threads and evaluated concurrently.
#[derive(Debug, Clone)]
pub struct DateCompareRule {
    /// Date format.
    format: DateFormat,
    /// Comparison operator as configured.
    operator: SharedString,
    /// Whether an empty value passes without comparison.
    allow_empty: bool,
    /// Comparison target.
    target: CompareTarget,
    /// Message overriding the keyed template.
    message: Option<SharedString>,
}

impl DateCompareRule {
    /// Attempts to construct a rule from the config.
    ///
    /// It fails if neither a compare value nor a compare attribute has been specified,
    /// or if the date format contains an unsupported specifier.
    /// A constant takes precedence over a sibling field when both are present.
    pub fn try_new(config: RuleConfig) -> Result<Self, Error> {
        let compare_value = config.compare_value.filter(|value| !value.is_empty());
        let compare_attribute = config.compare_attribute.filter(|name| !name.is_empty());
        let target = match (compare_value, compare_attribute) {
            (Some(value), _) => CompareTarget::Value(value),
            (None, Some(name)) => CompareTarget::Attribute(name),
            (None, None) => {
                return Err(Error::new(
                    "must specify either a compare attribute or a compare value",
                ));
            }
        };
        let format = DateFormat::new(config.format)
            .map_err(|err| err.wrap("fail to construct the date comparison rule"))?;
        tracing::debug!(
            format = format.pattern(),
            operator = %config.operator,
            "date comparison rule constructed"
        );
        Ok(Self {
            format,
            operator: config.operator,
            allow_empty: config.allow_empty,
            target,
            message: config.message,
        })
    }

    /// Returns the date format.
    #[inline]
    pub fn format(&self) -> &DateFormat {
        &self.format
    }

    /// Returns the comparison target.
    #[inline]
    pub fn target(&self) -> &CompareTarget {
        &self.target
    }

    /// Evaluates the rule for the subject value.
    ///
    /// Data-dependent failures are returned as [`ComparisonOutcome::Invalid`].
    /// An `Err` is returned only for an unknown operator,
    /// which is detected after both dates have been parsed successfully.
    pub fn evaluate<A>(
        &self,
        subject: Option<&str>,
        attributes: &A,
    ) -> Result<ComparisonOutcome, Error>
    where
        A: AttributeAccess + ?Sized,
    {
        let subject = subject.unwrap_or_default();
        if self.allow_empty && subject.is_empty() {
            return Ok(ComparisonOutcome::Valid);
        }

        let (compare_value, compare_target, reported_field) = match &self.target {
            CompareTarget::Value(value) => (
                value.to_string(),
                value.clone(),
                ReportedField::Subject,
            ),
            CompareTarget::Attribute(name) => (
                attributes
                    .attribute_value(name)
                    .map(|value| value.into_owned())
                    .unwrap_or_default(),
                attributes.attribute_label(name),
                ReportedField::Attribute(name.clone()),
            ),
        };

        let subject_date = match self.format.parse(subject) {
            Ok(date) => date,
            Err(err) => {
                tracing::debug!(
                    format = self.format.pattern(),
                    "invalid value `{subject}`: {err}"
                );
                let violation = Violation::new(MessageKey::InvalidSubjectDateFormat)
                    .with_param("value", subject);
                return Ok(ComparisonOutcome::Invalid(violation));
            }
        };
        let compare_date = match self.format.parse(&compare_value) {
            Ok(date) => date,
            Err(err) => {
                tracing::debug!(
                    format = self.format.pattern(),
                    "invalid compare value `{compare_value}`: {err}"
                );
                let violation = Violation::new(MessageKey::InvalidCompareDateFormat)
                    .with_field(reported_field)
                    .with_param("value", compare_value);
                return Ok(ComparisonOutcome::Invalid(violation));
            }
        };

        let operator = self.operator.parse::<CompareOperator>()?;
        if operator.compare(&subject_date, &compare_date) {
            return Ok(ComparisonOutcome::Valid);
        }

        let mut violation = Violation::new(operator.message_key())
            .with_param("compareTarget", compare_target)
            .with_param("compareValue", compare_value);
        if let Some(message) = &self.message {
            violation = violation.with_message(message.clone());
        }
        Ok(ComparisonOutcome::Invalid(violation))
    }

    /// Validates the field of the model and records the violation if there is any.
    ///
    /// A malformed sibling field is recorded against that field,
    /// while all other violations are recorded against `attribute`.
    pub fn validate_attribute<A>(
        &self,
        model: &A,
        attribute: &str,
        validation: &mut Validation,
    ) -> Result<(), Error>
    where
        A: AttributeAccess + ?Sized,
    {
        let subject = model.attribute_value(attribute);
        let outcome = self
            .evaluate(subject.as_deref(), model)
            .map_err(|err| err.wrap(format!("fail to validate `{attribute}`")))?;
        if let Some(violation) = outcome.into_violation() {
            let key = match violation.field() {
                ReportedField::Attribute(name) => name.clone(),
                ReportedField::Subject => attribute.to_owned().into(),
            };
            validation.record_violation(key, violation);
        }
        Ok(())
    }
}
