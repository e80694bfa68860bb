//! Date patterns and format-exact parsing.

mod format;

pub use format::DateFormat;

/// Default date format used by comparison rules.
pub const DEFAULT_DATE_FORMAT: &str = "d.m.Y";
