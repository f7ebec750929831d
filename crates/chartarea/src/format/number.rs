use std::str::FromStr;

use log::debug;
use num_format::{CustomFormat, Grouping, ToFormattedString};

use crate::{config::Locale, error::FormatError};

const BODY_CHARS: &[char] = &['#', '0', ',', '.'];

/// A parsed decimal number pattern such as `#,##0.00`, `0%` or `$#,##0`.
///
/// Pattern syntax:
/// - `0` is a mandatory digit, `#` an optional one.
/// - `,` in the integer part turns on digit grouping.
/// - `.` separates the integer and fraction parts.
/// - Any text before or after the digit body is kept literally; a `%`
///   anywhere in it multiplies the value by 100.
#[derive(Debug, Clone, PartialEq)]
pub struct NumberPattern {
    prefix: String,
    suffix: String,
    min_integer_digits: usize,
    min_fraction_digits: usize,
    max_fraction_digits: usize,
    grouping: bool,
    percent: bool,
}

impl NumberPattern {
    /// Parses a pattern.
    ///
    /// # Errors
    ///
    /// Returns [`FormatError::NumberPattern`] when the pattern has no digit
    /// body, more than one decimal point, grouping in the fraction or
    /// mandatory digits after optional ones.
    pub fn parse(pattern: &str) -> Result<Self, FormatError> {
        let invalid = || FormatError::NumberPattern(pattern.to_string());

        let start = pattern.find(BODY_CHARS).ok_or_else(invalid)?;
        let end = pattern[start..]
            .find(|c: char| !BODY_CHARS.contains(&c))
            .map_or(pattern.len(), |offset| start + offset);

        let prefix = &pattern[..start];
        let body = &pattern[start..end];
        let suffix = &pattern[end..];

        let (integer, fraction) = match body.split_once('.') {
            Some((_, fraction)) if fraction.contains('.') => return Err(invalid()),
            Some((integer, fraction)) => (integer, fraction),
            None => (body, ""),
        };

        if fraction.contains(',') || integer.ends_with(',') {
            return Err(invalid());
        }
        if integer.chars().skip_while(|&c| c != '0').any(|c| c == '#') {
            return Err(invalid());
        }
        if fraction.chars().skip_while(|&c| c != '#').any(|c| c == '0') {
            return Err(invalid());
        }
        if !integer.contains(['#', '0']) && !fraction.contains(['#', '0']) {
            return Err(invalid());
        }

        Ok(Self {
            prefix: prefix.to_string(),
            suffix: suffix.to_string(),
            min_integer_digits: integer.matches('0').count(),
            min_fraction_digits: fraction.matches('0').count(),
            max_fraction_digits: fraction.len(),
            grouping: integer.contains(','),
            percent: prefix.contains('%') || suffix.contains('%'),
        })
    }

    pub fn max_fraction_digits(&self) -> usize {
        self.max_fraction_digits
    }

    /// Formats `value` with the separators of `locale`.
    pub fn format(&self, value: f64, locale: &Locale) -> String {
        let value = if self.percent { value * 100.0 } else { value };
        if !value.is_finite() {
            return format!("{}{value}{}", self.prefix, self.suffix);
        }

        let rendered = format!("{:.*}", self.max_fraction_digits, value.abs());
        let (integer, fraction) = rendered.split_once('.').unwrap_or((&rendered, ""));

        let mut fraction = fraction.to_string();
        while fraction.len() > self.min_fraction_digits && fraction.ends_with('0') {
            fraction.pop();
        }

        let mut integer = integer.trim_start_matches('0').to_string();
        while integer.len() < self.min_integer_digits {
            integer.insert(0, '0');
        }
        if integer.is_empty() && fraction.is_empty() {
            integer.push('0');
        }

        let is_zero = integer.chars().chain(fraction.chars()).all(|c| c == '0');

        let mut out = String::new();
        if value < 0.0 && !is_zero {
            out.push('-');
        }
        out.push_str(&self.prefix);
        if self.grouping {
            out.push_str(&group_digits(&integer, locale.grouping_separator()));
        } else {
            out.push_str(&integer);
        }
        if !fraction.is_empty() {
            out.push(locale.decimal_separator());
            out.push_str(&fraction);
        }
        out.push_str(&self.suffix);
        out
    }
}

impl FromStr for NumberPattern {
    type Err = FormatError;

    fn from_str(pattern: &str) -> Result<Self, Self::Err> {
        Self::parse(pattern)
    }
}

/// Groups an unsigned digit string in threes with `separator`, keeping any
/// leading zeros. Digit strings too long for `u128` stay ungrouped.
fn group_digits(digits: &str, separator: char) -> String {
    let format = match CustomFormat::builder()
        .grouping(Grouping::Standard)
        .separator(separator.to_string())
        .build()
    {
        Ok(format) => format,
        Err(err) => {
            debug!(error:% = err, separator:? = separator; "Number grouping unavailable");
            return digits.to_string();
        }
    };
    grouped_with_padding(digits, &format).unwrap_or_else(|| digits.to_string())
}

/// Formats `10^len + digits` and drops the leading `1`, so zero padding goes
/// through the same grouping as the significant digits.
fn grouped_with_padding(digits: &str, format: &CustomFormat) -> Option<String> {
    let width = u32::try_from(digits.len()).ok()?;
    let value: u128 = digits.parse().ok()?;
    let marked = 10u128.checked_pow(width)?.checked_add(value)?;
    let grouped = marked.to_formatted_string(format);
    let grouped = grouped.strip_prefix('1')?;
    Some(grouped.strip_prefix(format.separator()).unwrap_or(grouped).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn format(pattern: &str, value: f64) -> String {
        NumberPattern::parse(pattern)
            .expect("valid pattern")
            .format(value, &Locale::default())
    }

    #[test]
    fn test_grouping_and_fraction() {
        assert_eq!(format("#,##0.00", 1234567.891), "1,234,567.89");
        assert_eq!(format("#,##0.00", 12.0), "12.00");
        assert_eq!(format("#,##0", 999.0), "999");
        assert_eq!(format("#,##0", 1000.0), "1,000");
    }

    #[test]
    fn test_optional_fraction_digits() {
        assert_eq!(format("0.##", 2.5), "2.5");
        assert_eq!(format("0.##", 2.0), "2");
        assert_eq!(format("#.##", 0.25), ".25");
        assert_eq!(format("#.##", 0.0), "0");
    }

    #[test]
    fn test_percent_and_literals() {
        assert_eq!(format("0%", 0.256), "26%");
        assert_eq!(format("$#,##0.0", 1500.0), "$1,500.0");
        assert_eq!(format("0.0 kg", 3.0), "3.0 kg");
    }

    #[test]
    fn test_negative_values() {
        assert_eq!(format("$#,##0", -1234.0), "-$1,234");
        assert_eq!(format("0.0", -0.01), "0.0");
    }

    #[test]
    fn test_locale_separators() {
        let pattern = NumberPattern::parse("#,##0.00").expect("valid pattern");
        let locale = Locale::new(',', '.');
        assert_eq!(pattern.format(1234.5, &locale), "1.234,50");
    }

    #[test]
    fn test_grouping_with_locale_separators() {
        let pattern = NumberPattern::parse("#,##0.00").expect("valid pattern");
        let locale = Locale::new(',', '.');
        assert_eq!(pattern.format(1234567.891, &locale), "1.234.567,89");
        assert_eq!(pattern.format(-987654.0, &locale), "-987.654,00");

        let spaced = Locale::new('.', ' ');
        assert_eq!(pattern.format(1000000.0, &spaced), "1 000 000.00");
    }

    #[test]
    fn test_grouping_keeps_zero_padding() {
        assert_eq!(format("0,000", 7.0), "0,007");
        assert_eq!(format("#,##0", 0.0), "0");
        assert_eq!(format("#,##0", 123.0), "123");
        assert_eq!(group_digits("1234", ','), "1,234");
    }

    #[test]
    fn test_grouping_of_huge_values_stays_plain() {
        let digits = "1".repeat(45);
        assert_eq!(group_digits(&digits, ','), digits);
    }

    #[test]
    fn test_invalid_patterns() {
        for pattern in ["abc", "0.0.0", "0.0,0", "0#", "0.#0", "#,", ","] {
            assert!(
                NumberPattern::parse(pattern).is_err(),
                "pattern `{pattern}` should be rejected"
            );
        }
    }
}
