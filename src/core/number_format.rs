use rust_decimal::{Decimal, RoundingStrategy};
use tracing::warn;

use crate::core::primitives::f64_to_decimal;
use crate::error::{ChartError, ChartResult};

pub const DEFAULT_NUMBER_FORMAT: &str = "0,0[.]00";
pub const DEFAULT_PERCENT_FORMAT: &str = "0[.]00%";

const MAX_DECIMALS: usize = 20;

const ABBREVIATIONS: [(f64, &str); 5] = [
    (1.0, ""),
    (1e3, "k"),
    (1e6, "m"),
    (1e9, "b"),
    (1e12, "t"),
];

/// Parsed numeral-style number pattern.
///
/// Supported grammar, around a literal prefix and suffix:
/// - `0` or `0,0` (thousands separators)
/// - `.00` fixed decimals, `[.]00` optional decimals, `.0[00]` one to three decimals
/// - trailing `a` abbreviates with `k`/`m`/`b`/`t`
///
/// A `%` in the suffix is literal: percent values are already expressed in
/// percent units and are not scaled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumberPattern {
    prefix: String,
    thousands: bool,
    min_decimals: usize,
    max_decimals: usize,
    abbreviate: bool,
    suffix: String,
}

impl NumberPattern {
    pub fn parse(pattern: &str) -> ChartResult<Self> {
        let Some(start) = pattern.find('0') else {
            return Err(ChartError::InvalidConfig(format!(
                "number pattern has no digit placeholder: {pattern:?}"
            )));
        };
        let prefix = pattern[..start].to_owned();
        let mut rest = &pattern[start + 1..];

        let thousands = if let Some(after) = rest.strip_prefix(",0") {
            rest = after;
            true
        } else {
            false
        };

        let (mut min_decimals, mut max_decimals) = (0, 0);
        if let Some(after) = rest.strip_prefix("[.]") {
            let zeros = count_zeros(after);
            max_decimals = zeros;
            rest = &after[zeros..];
        } else if let Some(after) = rest.strip_prefix('.') {
            let zeros = count_zeros(after);
            min_decimals = zeros;
            max_decimals = zeros;
            rest = &after[zeros..];
            if let Some(optional) = rest.strip_prefix('[') {
                let extra = count_zeros(optional);
                if optional[extra..].starts_with(']') {
                    max_decimals += extra;
                    rest = &optional[extra + 1..];
                }
            }
        }
        if max_decimals > MAX_DECIMALS {
            return Err(ChartError::InvalidConfig(format!(
                "number pattern requests more than {MAX_DECIMALS} decimals: {pattern:?}"
            )));
        }

        let abbreviate = if let Some(after) = rest.strip_prefix('a') {
            rest = after;
            true
        } else if let Some(after) = rest.strip_prefix(" a") {
            rest = after;
            true
        } else {
            false
        };

        Ok(Self {
            prefix,
            thousands,
            min_decimals,
            max_decimals,
            abbreviate,
            suffix: rest.to_owned(),
        })
    }

    /// Renders `value`; non-finite input renders as an empty string.
    #[must_use]
    pub fn format(&self, value: f64) -> String {
        if !value.is_finite() {
            return String::new();
        }

        let (scaled, unit) = if self.abbreviate {
            self.abbreviated(value)
        } else {
            (value, "")
        };

        let digits = self.format_digits(scaled);
        let mut out =
            String::with_capacity(self.prefix.len() + digits.len() + unit.len() + self.suffix.len());
        out.push_str(&self.prefix);
        out.push_str(&digits);
        out.push_str(unit);
        out.push_str(&self.suffix);
        out
    }

    fn round(&self, value: Decimal) -> Decimal {
        value.round_dp_with_strategy(
            self.max_decimals as u32,
            RoundingStrategy::MidpointAwayFromZero,
        )
    }

    /// Picks the abbreviation unit from the rounded magnitude, so `999_999`
    /// with one decimal reads `1.0m` rather than `1000.0k`.
    fn abbreviated(&self, value: f64) -> (f64, &'static str) {
        let abs = value.abs();
        let mut unit = ABBREVIATIONS
            .iter()
            .rposition(|(scale, _)| abs >= *scale)
            .unwrap_or(0);
        let mut scaled = value / ABBREVIATIONS[unit].0;
        let carries = f64_to_decimal(scaled)
            .is_some_and(|decimal| self.round(decimal).abs() >= Decimal::ONE_THOUSAND);
        if carries && unit + 1 < ABBREVIATIONS.len() {
            unit += 1;
            scaled = value / ABBREVIATIONS[unit].0;
        }
        (scaled, ABBREVIATIONS[unit].1)
    }

    fn format_digits(&self, value: f64) -> String {
        let rounded = match f64_to_decimal(value) {
            Some(decimal) => {
                let mut rounded = self.round(decimal);
                if rounded.is_zero() {
                    rounded.set_sign_positive(true);
                }
                decimal_to_plain(rounded)
            }
            // Outside the decimal range; float formatting is precise enough there.
            None => format!("{value:.prec$}", prec = self.max_decimals),
        };

        let (negative, unsigned) = match rounded.strip_prefix('-') {
            Some(unsigned) => (true, unsigned),
            None => (false, rounded.as_str()),
        };
        let (int_part, frac_part) = unsigned.split_once('.').unwrap_or((unsigned, ""));

        let mut frac = frac_part.to_owned();
        frac.truncate(self.max_decimals);
        while frac.len() < self.max_decimals {
            frac.push('0');
        }
        while frac.len() > self.min_decimals && frac.ends_with('0') {
            frac.pop();
        }

        let mut out = String::with_capacity(unsigned.len() + unsigned.len() / 3 + 2);
        if negative {
            out.push('-');
        }
        if self.thousands {
            push_grouped(&mut out, int_part);
        } else {
            out.push_str(int_part);
        }
        if !frac.is_empty() {
            out.push('.');
            out.push_str(&frac);
        }
        out
    }
}

fn count_zeros(text: &str) -> usize {
    text.bytes().take_while(|b| *b == b'0').count()
}

fn decimal_to_plain(value: Decimal) -> String {
    value.normalize().to_string()
}

fn push_grouped(out: &mut String, int_part: &str) {
    let len = int_part.len();
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
}

/// Number formatter built from a configured pattern.
///
/// Construction never fails: an unusable pattern logs a warning and falls
/// back to [`DEFAULT_NUMBER_FORMAT`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumberFormatter {
    pattern: NumberPattern,
}

impl NumberFormatter {
    #[must_use]
    pub fn new(pattern: &str) -> Self {
        match Self::try_new(pattern) {
            Ok(formatter) => formatter,
            Err(err) => {
                warn!(error = %err, "falling back to default number pattern");
                Self::default()
            }
        }
    }

    pub fn try_new(pattern: &str) -> ChartResult<Self> {
        Ok(Self {
            pattern: NumberPattern::parse(pattern)?,
        })
    }

    /// Renders a value; `None`, `NaN` and infinities render as `""`.
    #[must_use]
    pub fn format(&self, value: Option<f64>) -> String {
        value.map_or_else(String::new, |value| self.pattern.format(value))
    }
}

impl Default for NumberFormatter {
    fn default() -> Self {
        Self {
            pattern: NumberPattern {
                prefix: String::new(),
                thousands: true,
                min_decimals: 0,
                max_decimals: 2,
                abbreviate: false,
                suffix: String::new(),
            },
        }
    }
}

/// One-shot formatting of `value` with `pattern`.
#[must_use]
pub fn format_number(value: Option<f64>, pattern: &str) -> String {
    NumberFormatter::new(pattern).format(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn optional_decimal_pattern_parses() {
        let pattern = NumberPattern::parse("0,0[.]00").expect("pattern");
        assert!(pattern.thousands);
        assert_eq!((pattern.min_decimals, pattern.max_decimals), (0, 2));
        assert!(pattern.suffix.is_empty());
    }

    #[test]
    fn mixed_decimal_pattern_parses() {
        let pattern = NumberPattern::parse("$0.0[00] USD").expect("pattern");
        assert_eq!(pattern.prefix, "$");
        assert_eq!((pattern.min_decimals, pattern.max_decimals), (1, 3));
        assert_eq!(pattern.suffix, " USD");
    }

    #[test]
    fn pattern_without_placeholder_is_rejected() {
        assert!(NumberPattern::parse("###").is_err());
    }

    #[test]
    fn grouping_inserts_separators_from_the_right() {
        let mut out = String::new();
        push_grouped(&mut out, "1234567");
        assert_eq!(out, "1,234,567");
    }
}
