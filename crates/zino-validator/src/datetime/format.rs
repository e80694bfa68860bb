use crate::{SharedString, error::Error};
use chrono::{
    NaiveDateTime,
    format::{Item, Numeric, ParseResult, Parsed, StrftimeItems},
};
use std::{fmt, iter, mem, str::FromStr};

/// A compiled date pattern written with single-letter specifiers, e.g. `d.m.Y` or `Y-m-d H:i:s`.
///
/// | Specifier | Meaning |
/// |-----------|---------|
/// | `d`, `j` | Day of the month with one or two digits |
/// | `m`, `n` | Month number with one or two digits |
/// | `M`, `F` | Abbreviated or full month name |
/// | `D`, `l` | Abbreviated or full weekday name |
/// | `Y`, `y` | Full year or two-digit year (`70..=99` maps to the 1900s) |
/// | `H`, `G` | Hour of the day in the 24-hour clock |
/// | `h`, `g` | Hour in the 12-hour clock |
/// | `A`, `a` | Ante meridiem or post meridiem |
/// | `i`, `s` | Minutes and seconds |
/// | `u`, `v` | Microseconds with exactly six digits, milliseconds with exactly three |
/// | `U` | Seconds since the Unix epoch |
/// | `O`, `P` | UTC offset such as `+0200` or `+02:00` |
/// | `\` | Escapes the next character |
///
/// Numeric fields only accept ASCII digits: signs and leading whitespace are rejected,
/// and `Y` takes at most four digits. Only `U` may carry a minus sign.
///
/// The reset markers `!` and `|` are accepted and ignored: fields missing from the pattern
/// always default to the Unix epoch and midnight, never to the current time.
/// Any other ASCII letter is rejected when the pattern is compiled.
#[derive(Debug, Clone)]
pub struct DateFormat {
    /// Original pattern.
    pattern: SharedString,
    /// Parsing items.
    items: Vec<Item<'static>>,
    /// Components specified by the pattern.
    components: Components,
}

impl DateFormat {
    /// Compiles the pattern.
    pub fn new(pattern: impl Into<SharedString>) -> Result<Self, Error> {
        let pattern = pattern.into();
        if pattern.is_empty() {
            return Err(Error::new("the date format should be nonempty"));
        }

        let mut items = Vec::new();
        let mut components = Components::default();
        let mut literal = String::new();
        let mut chars = pattern.chars();
        while let Some(c) = chars.next() {
            match c {
                '\\' => literal.push(chars.next().unwrap_or('\\')),
                '!' | '|' => {}
                _ if c.is_whitespace() => {
                    flush_literal(&mut items, &mut literal);
                    items.push(Item::Space(" "));
                }
                _ if c.is_ascii_alphabetic() => {
                    let Some((spec, component)) = specifier(c) else {
                        let message =
                            format!("unsupported specifier `{c}` in the date format `{pattern}`");
                        return Err(Error::new(message));
                    };
                    flush_literal(&mut items, &mut literal);
                    items.extend(StrftimeItems::new(spec));
                    components.mark(component);
                }
                _ => literal.push(c),
            }
        }
        flush_literal(&mut items, &mut literal);
        Ok(Self {
            pattern,
            items,
            components,
        })
    }

    /// Returns the original pattern.
    #[inline]
    pub fn pattern(&self) -> &str {
        self.pattern.as_ref()
    }

    /// Parses the value as an instant normalized to UTC.
    ///
    /// The whole input has to match the pattern: leading or trailing garbage is an error.
    pub fn parse(&self, value: &str) -> Result<NaiveDateTime, Error> {
        let mut parsed = Parsed::new();
        let mut remainder = value;
        for item in &self.items {
            check_input(item, remainder)?;
            remainder =
                chrono::format::parse_and_remainder(&mut parsed, remainder, iter::once(item))?;
        }
        if !remainder.is_empty() {
            return Err(Error::new(format!("unexpected trailing input `{remainder}`")));
        }
        self.components.fill_defaults(&mut parsed)?;
        let datetime = if self.components.offset {
            parsed.to_datetime()?.naive_utc()
        } else {
            parsed.to_naive_datetime_with_offset(0)?
        };
        Ok(datetime)
    }

    /// Returns `true` if the value matches the pattern.
    #[inline]
    pub fn matches(&self, value: &str) -> bool {
        self.parse(value).is_ok()
    }
}

impl fmt::Display for DateFormat {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.pattern)
    }
}

impl FromStr for DateFormat {
    type Err = Error;

    #[inline]
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s.to_owned())
    }
}

/// A date or time component filled in by a specifier.
#[derive(Debug, Clone, Copy)]
enum Component {
    Year,
    Month,
    Day,
    Weekday,
    Hour,
    Hour12,
    Meridiem,
    Minute,
    Second,
    Fraction,
    Timestamp,
    Offset,
}

/// Components present in a pattern.
#[derive(Debug, Clone, Copy, Default)]
struct Components {
    year: bool,
    month: bool,
    day: bool,
    hour: bool,
    hour12: bool,
    meridiem: bool,
    minute: bool,
    timestamp: bool,
    offset: bool,
}

impl Components {
    fn mark(&mut self, component: Component) {
        match component {
            Component::Year => self.year = true,
            Component::Month => self.month = true,
            Component::Day => self.day = true,
            Component::Hour => self.hour = true,
            Component::Hour12 => self.hour12 = true,
            Component::Meridiem => self.meridiem = true,
            Component::Minute => self.minute = true,
            Component::Timestamp => self.timestamp = true,
            Component::Offset => self.offset = true,
            Component::Weekday | Component::Second | Component::Fraction => {}
        }
    }

    /// Sets the fields not covered by the pattern.
    fn fill_defaults(&self, parsed: &mut Parsed) -> ParseResult<()> {
        if self.timestamp {
            return Ok(());
        }
        if !self.year {
            parsed.set_year(1970)?;
        }
        if !self.month {
            parsed.set_month(1)?;
        }
        if !self.day {
            parsed.set_day(1)?;
        }
        if !self.hour && !self.hour12 {
            parsed.set_hour(0)?;
        } else if self.hour12 && !self.meridiem {
            parsed.set_ampm(false)?;
        }
        if !self.minute {
            parsed.set_minute(0)?;
        }
        Ok(())
    }
}

/// Maps a specifier to the `strftime` sequence and the component it fills in.
fn specifier(c: char) -> Option<(&'static str, Component)> {
    let spec = match c {
        'd' | 'j' => ("%d", Component::Day),
        'm' | 'n' => ("%m", Component::Month),
        'M' => ("%b", Component::Month),
        'F' => ("%B", Component::Month),
        'D' => ("%a", Component::Weekday),
        'l' => ("%A", Component::Weekday),
        'Y' => ("%Y", Component::Year),
        'y' => ("%y", Component::Year),
        'H' | 'G' => ("%H", Component::Hour),
        'h' | 'g' => ("%I", Component::Hour12),
        'A' | 'a' => ("%p", Component::Meridiem),
        'i' => ("%M", Component::Minute),
        's' => ("%S", Component::Second),
        'u' => ("%6f", Component::Fraction),
        'v' => ("%3f", Component::Fraction),
        'U' => ("%s", Component::Timestamp),
        'O' => ("%z", Component::Offset),
        'P' => ("%:z", Component::Offset),
        _ => return None,
    };
    Some(spec)
}

/// Checks the input where the item starts, before it is handed over to chrono.
fn check_input(item: &Item<'_>, input: &str) -> Result<(), Error> {
    match item {
        Item::Literal(_) | Item::OwnedLiteral(_) | Item::Space(_) | Item::OwnedSpace(_) => Ok(()),
        Item::Numeric(numeric, _) => {
            let digits = match input.strip_prefix('-') {
                Some(digits) if *numeric == Numeric::Timestamp => digits,
                _ => input,
            };
            if digits.starts_with(|c: char| c.is_ascii_digit()) {
                Ok(())
            } else {
                Err(Error::new(format!("invalid digits in `{input}`")))
            }
        }
        _ if input.starts_with(char::is_whitespace) => {
            Err(Error::new(format!("unexpected whitespace in `{input}`")))
        }
        _ => Ok(()),
    }
}

fn flush_literal(items: &mut Vec<Item<'static>>, literal: &mut String) {
    if !literal.is_empty() {
        items.push(Item::OwnedLiteral(mem::take(literal).into_boxed_str()));
    }
}

#[cfg(test)]
mod tests {
    use super::DateFormat;
    use chrono::{DateTime, NaiveDate, NaiveDateTime};

    fn datetime(year: i32, month: u32, day: u32, hour: u32, min: u32, sec: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(year, month, day)
            .and_then(|date| date.and_hms_opt(hour, min, sec))
            .unwrap()
    }

    #[test]
    fn it_parses_dates() {
        let format = DateFormat::new("d.m.Y").unwrap();
        assert_eq!(format.parse("01.01.2020").ok(), Some(datetime(2020, 1, 1, 0, 0, 0)));
        assert_eq!(format.parse("1.1.2020").ok(), Some(datetime(2020, 1, 1, 0, 0, 0)));
        assert_eq!(format.parse("29.02.2024").ok(), Some(datetime(2024, 2, 29, 0, 0, 0)));
        assert!(format.parse("29.02.2023").is_err());
        assert!(format.parse("32.01.2020").is_err());

        let format = "d.m.y".parse::<DateFormat>().unwrap();
        assert_eq!(format.parse("01.01.69").ok(), Some(datetime(2069, 1, 1, 0, 0, 0)));
        assert_eq!(format.parse("01.01.70").ok(), Some(datetime(1970, 1, 1, 0, 0, 0)));

        let format = DateFormat::new("d M Y").unwrap();
        assert_eq!(format.parse("07 Mar 2021").ok(), Some(datetime(2021, 3, 7, 0, 0, 0)));

        let format = DateFormat::new(r"Y\Wm").unwrap();
        assert_eq!(format.parse("2021W03").ok(), Some(datetime(2021, 3, 1, 0, 0, 0)));
    }

    #[test]
    fn it_rejects_partial_matches() {
        let format = DateFormat::new("d.m.Y").unwrap();
        assert!(!format.matches(" 01.01.2020"));
        assert!(!format.matches("01. 01. 2020"));
        assert!(!format.matches("01.01.+2020"));
        assert!(!format.matches("01.01.-2020"));
        assert!(!format.matches("01.01.20201"));
        assert!(!format.matches("+1.01.2020"));
        assert!(!format.matches("2020-01-01"));
        assert!(!format.matches("01.01.2020 12:00"));
        assert!(!format.matches("01.01.2020x"));
        assert!(!format.matches("01.01."));
        assert!(!format.matches(""));
    }

    #[test]
    fn it_parses_times() {
        let format = DateFormat::new("Y-m-d H:i:s").unwrap();
        assert_eq!(
            format.parse("2024-02-29 13:45:10").ok(),
            Some(datetime(2024, 2, 29, 13, 45, 10))
        );

        let format = DateFormat::new("d/m/Y g:i A").unwrap();
        assert_eq!(
            format.parse("05/06/2023 3:15 PM").ok(),
            Some(datetime(2023, 6, 5, 15, 15, 0))
        );

        let format = DateFormat::new("H:i").unwrap();
        assert_eq!(format.parse("08:30").ok(), Some(datetime(1970, 1, 1, 8, 30, 0)));

        let format = DateFormat::new("YmdHis").unwrap();
        assert_eq!(
            format.parse("20240229134510").ok(),
            Some(datetime(2024, 2, 29, 13, 45, 10))
        );
    }

    #[test]
    fn it_reads_fractions_with_exact_widths() {
        let format = DateFormat::new("H:i:s.u").unwrap();
        let expected = NaiveDate::from_ymd_opt(1970, 1, 1)
            .and_then(|date| date.and_hms_micro_opt(8, 30, 15, 123_456));
        assert_eq!(format.parse("08:30:15.123456").ok(), expected);
        assert!(!format.matches("08:30:15.123"));

        let format = DateFormat::new("H:i:s.v").unwrap();
        assert!(format.matches("08:30:15.123"));
        assert!(!format.matches("08:30:15.12"));
    }

    #[test]
    fn it_normalizes_offsets() {
        let format = DateFormat::new("Y-m-d H:i O").unwrap();
        assert_eq!(
            format.parse("2024-01-01 02:00 +0200").ok(),
            Some(datetime(2024, 1, 1, 0, 0, 0))
        );
        assert_eq!(
            format.parse("2024-01-01 02:00 +0200").ok(),
            format.parse("2024-01-01 00:00 +0000").ok()
        );

        let format = DateFormat::new("U").unwrap();
        let expected = DateTime::from_timestamp(1_700_000_000, 0).map(|dt| dt.naive_utc());
        assert_eq!(format.parse("1700000000").ok(), expected);
    }

    #[test]
    fn it_rejects_unsupported_patterns() {
        assert!(DateFormat::new("").is_err());
        assert!(DateFormat::new("d.m.Y z").is_err());
        assert!("Y-m-d\\TH:i:s".parse::<DateFormat>().is_ok());
        assert_eq!(DateFormat::new("d.m.Y").unwrap().to_string(), "d.m.Y");
    }
}
