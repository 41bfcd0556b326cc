use std::fmt::Write as _;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::primitives::unix_millis_to_datetime;
use crate::core::types::CellValue;

/// Declared kind of a chart axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AxisType {
    /// Renderer-chosen axis kind (`"-"`); values pass through unchanged.
    #[serde(rename = "-")]
    Auto,
    Category,
    Datetime,
    Linear,
    #[serde(alias = "log")]
    Logarithmic,
    #[serde(other)]
    Unknown,
}

impl AxisType {
    #[must_use]
    pub fn is_category(self) -> bool {
        matches!(self, Self::Category)
    }
}

pub const DEFAULT_DATE_TIME_FORMAT: &str = "DD/MM/YY HH:mm";

/// Date-time display pattern, stored as a chrono strftime string.
///
/// Accepts strftime input directly (anything containing `%`) or moment-style
/// tokens such as `YYYY-MM-DD HH:mm:ss`, which are translated once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateTimePattern {
    strftime: String,
}

impl DateTimePattern {
    #[must_use]
    pub fn new(pattern: &str) -> Self {
        let strftime = if pattern.contains('%') {
            pattern.to_owned()
        } else {
            moment_to_strftime(pattern)
        };
        Self { strftime }
    }

    /// Renders `time` with this pattern, falling back to RFC 3339 when the
    /// pattern contains an item chrono cannot format.
    #[must_use]
    pub fn format(&self, time: DateTime<Utc>) -> String {
        let mut out = String::new();
        if write!(out, "{}", time.format(&self.strftime)).is_err() {
            return time.to_rfc3339();
        }
        out
    }
}

impl Default for DateTimePattern {
    fn default() -> Self {
        Self::new(DEFAULT_DATE_TIME_FORMAT)
    }
}

const MOMENT_TOKENS: &[(&str, &str)] = &[
    ("YYYY", "%Y"),
    ("YY", "%y"),
    ("MMMM", "%B"),
    ("MMM", "%b"),
    ("MM", "%m"),
    ("M", "%-m"),
    ("DD", "%d"),
    ("D", "%-d"),
    ("dddd", "%A"),
    ("ddd", "%a"),
    ("HH", "%H"),
    ("H", "%-H"),
    ("hh", "%I"),
    ("h", "%-I"),
    ("mm", "%M"),
    ("m", "%-M"),
    ("ss", "%S"),
    ("s", "%-S"),
    ("SSS", "%3f"),
    ("A", "%p"),
    ("a", "%P"),
    ("Z", "%:z"),
];

fn moment_to_strftime(pattern: &str) -> String {
    let mut out = String::with_capacity(pattern.len() * 2);
    let mut rest = pattern;
    'scan: while let Some(ch) = rest.chars().next() {
        // `[...]` is an escaped literal block.
        if ch == '[' {
            if let Some(end) = rest.find(']') {
                out.push_str(&rest[1..end]);
                rest = &rest[end + 1..];
                continue;
            }
        }
        for (token, replacement) in MOMENT_TOKENS {
            if rest.starts_with(token) {
                out.push_str(replacement);
                rest = &rest[token.len()..];
                continue 'scan;
            }
        }
        out.push(ch);
        rest = &rest[ch.len_utf8()..];
    }
    out
}

const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

/// Interprets a raw cell as a UTC timestamp.
///
/// Numbers are epoch milliseconds. Strings accept RFC 3339, naive
/// `YYYY-MM-DD[ T]HH:MM[:SS[.fff]]` (taken as UTC) and bare dates.
#[must_use]
pub fn parse_datetime(value: &CellValue) -> Option<DateTime<Utc>> {
    match value {
        CellValue::DateTime(time) => Some(*time),
        CellValue::Number(millis) => unix_millis_to_datetime(millis.0),
        CellValue::Text(text) => parse_datetime_str(text.trim()),
        CellValue::Null | CellValue::Bool(_) => None,
    }
}

fn parse_datetime_str(text: &str) -> Option<DateTime<Utc>> {
    if text.is_empty() {
        return None;
    }
    if let Ok(time) = DateTime::parse_from_rfc3339(text) {
        return Some(time.with_timezone(&Utc));
    }
    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, format) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Coerces a raw cell to the representation its axis expects.
///
/// Never fails: values that cannot be interpreted for the axis come back
/// unchanged, and an absent or unrecognized axis type is a pass-through.
/// Date-time cells are always rendered through `pattern`, whatever the axis.
#[must_use]
pub fn normalize_value(
    value: &CellValue,
    axis_type: Option<AxisType>,
    pattern: &DateTimePattern,
) -> CellValue {
    if let CellValue::DateTime(time) = value {
        return CellValue::Text(pattern.format(*time));
    }

    match axis_type {
        Some(AxisType::Datetime) => match parse_datetime(value) {
            Some(time) => CellValue::Text(pattern.format(time)),
            None => value.clone(),
        },
        Some(AxisType::Category) => match value {
            CellValue::Null | CellValue::Text(_) => value.clone(),
            other => CellValue::Text(other.to_string()),
        },
        // Numeric axes keep numbers as-is; display formatting happens later.
        Some(AxisType::Linear | AxisType::Logarithmic | AxisType::Auto | AxisType::Unknown)
        | None => value.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn moment_tokens_translate_longest_first() {
        assert_eq!(moment_to_strftime("DD/MM/YY HH:mm"), "%d/%m/%y %H:%M");
        assert_eq!(
            moment_to_strftime("YYYY-MM-DD HH:mm:ss.SSS"),
            "%Y-%m-%d %H:%M:%S.%3f"
        );
        assert_eq!(moment_to_strftime("[Week of] YYYY"), "Week of %Y");
    }

    #[test]
    fn strftime_patterns_are_kept_verbatim() {
        let pattern = DateTimePattern::new("%Y/%m/%d");
        assert_eq!(pattern.strftime, "%Y/%m/%d");
    }

    #[test]
    fn naive_strings_parse_as_utc() {
        let parsed = parse_datetime(&CellValue::text("2024-03-05 10:20:30")).expect("parsed");
        assert_eq!(parsed.to_rfc3339(), "2024-03-05T10:20:30+00:00");
        assert!(parse_datetime(&CellValue::text("not a date")).is_none());
    }
}
