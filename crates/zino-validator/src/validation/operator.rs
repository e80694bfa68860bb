use super::MessageKey;
use crate::error::Error;
use std::{fmt, str::FromStr};

/// Relational operators for comparing two values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompareOperator {
    /// `=` or `==`.
    Equal,
    /// `!=`.
    NotEqual,
    /// `>`.
    Greater,
    /// `>=`.
    GreaterOrEqual,
    /// `<`.
    Less,
    /// `<=`.
    LessOrEqual,
}

impl CompareOperator {
    /// Returns the symbol of the operator.
    #[inline]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Equal => "=",
            Self::NotEqual => "!=",
            Self::Greater => ">",
            Self::GreaterOrEqual => ">=",
            Self::Less => "<",
            Self::LessOrEqual => "<=",
        }
    }

    /// Returns `true` if `lhs op rhs` holds.
    #[inline]
    pub fn compare<T: PartialOrd + ?Sized>(&self, lhs: &T, rhs: &T) -> bool {
        match self {
            Self::Equal => lhs == rhs,
            Self::NotEqual => lhs != rhs,
            Self::Greater => lhs > rhs,
            Self::GreaterOrEqual => lhs >= rhs,
            Self::Less => lhs < rhs,
            Self::LessOrEqual => lhs <= rhs,
        }
    }

    /// Returns the message key reported when the comparison fails.
    #[inline]
    pub fn message_key(&self) -> MessageKey {
        match self {
            Self::Equal => MessageKey::MustBeEqual,
            Self::NotEqual => MessageKey::MustNotEqual,
            Self::Greater => MessageKey::MustBeGreater,
            Self::GreaterOrEqual => MessageKey::MustBeGreaterOrEqual,
            Self::Less => MessageKey::MustBeLess,
            Self::LessOrEqual => MessageKey::MustBeLessOrEqual,
        }
    }
}

impl fmt::Display for CompareOperator {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CompareOperator {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "=" | "==" => Ok(Self::Equal),
            "!=" => Ok(Self::NotEqual),
            ">" => Ok(Self::Greater),
            ">=" => Ok(Self::GreaterOrEqual),
            "<" => Ok(Self::Less),
            "<=" => Ok(Self::LessOrEqual),
            _ => Err(Error::new(format!("invalid operator `{s}`"))),
        }
    }
}
