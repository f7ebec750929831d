//! Locale-aware formatting of data values for tooltips and labels.
//!
//! A [`ValueFormatter`] belongs to one assembly pass. Parsed number patterns
//! are cached on it, so repeated formatting with the same pattern across many
//! elements parses the pattern only once.

mod date;
mod number;

pub use date::{format_date, parse_date};
pub use number::NumberPattern;

use std::collections::HashMap;

use log::trace;

use crate::{
    config::{Locale, TooltipConfig},
    data::Value,
    error::FormatError,
};

/// Formats values according to field patterns and a [`Locale`].
#[derive(Debug, Clone)]
pub struct ValueFormatter {
    locale: Locale,
    null_text: String,
    number_patterns: HashMap<String, NumberPattern>,
}

impl ValueFormatter {
    pub fn new(locale: Locale, null_text: impl Into<String>) -> Self {
        Self {
            locale,
            null_text: null_text.into(),
            number_patterns: HashMap::new(),
        }
    }

    /// Creates a formatter from the tooltip configuration section.
    pub fn from_config(config: &TooltipConfig) -> Self {
        Self::new(*config.locale(), config.null_text())
    }

    pub fn locale(&self) -> &Locale {
        &self.locale
    }

    /// Returns the number of distinct number patterns parsed so far.
    pub fn cached_patterns(&self) -> usize {
        self.number_patterns.len()
    }

    /// Renders a value without a pattern.
    ///
    /// Integral numbers print without a fraction; other numbers use the
    /// shortest exact representation with the locale decimal separator.
    pub fn format_default(&self, value: &Value) -> String {
        match value {
            Value::Null => self.null_text.clone(),
            Value::Number(number) if number.fract() == 0.0 && number.abs() < 1e15 => {
                format!("{number:.0}")
            }
            Value::Number(number) => number
                .to_string()
                .replace('.', &self.locale.decimal_separator().to_string()),
            other => other.to_string(),
        }
    }

    /// Formats a value as a number, with `pattern` or the default rendering.
    ///
    /// # Errors
    ///
    /// Fails when the pattern is malformed or the value is not numeric.
    pub fn format_number(
        &mut self,
        value: &Value,
        pattern: Option<&str>,
    ) -> Result<String, FormatError> {
        if value.is_null() {
            return Ok(self.null_text.clone());
        }
        let number = value.as_f64().ok_or_else(|| FormatError::ValueType {
            value: value.to_string(),
            expected: "number",
        })?;
        let Some(pattern) = pattern else {
            return Ok(self.format_default(&Value::Number(number)));
        };
        let locale = self.locale;
        Ok(self.number_pattern(pattern)?.format(number, &locale))
    }

    /// Formats a value as a date with a strftime pattern.
    ///
    /// Text values in ISO form are accepted.
    ///
    /// # Errors
    ///
    /// Fails when the pattern is malformed or the value is not a date.
    pub fn format_date(&self, value: &Value, pattern: &str) -> Result<String, FormatError> {
        let date = match value {
            Value::Null => return Ok(self.null_text.clone()),
            Value::Date(date) => *date,
            Value::Text(text) => parse_date(text).ok_or_else(|| FormatError::ValueType {
                value: text.clone(),
                expected: "date",
            })?,
            other => {
                return Err(FormatError::ValueType {
                    value: other.to_string(),
                    expected: "date",
                });
            }
        };
        format_date(&date, pattern)
    }

    /// Formats a value with the display format declared on its field.
    ///
    /// Numbers use the format as a number pattern and dates as a strftime
    /// pattern; other values ignore it.
    pub fn format_field(
        &mut self,
        value: &Value,
        format: Option<&str>,
    ) -> Result<String, FormatError> {
        match (value, format) {
            (Value::Number(_), Some(pattern)) => self.format_number(value, Some(pattern)),
            (Value::Date(_), Some(pattern)) => self.format_date(value, pattern),
            _ => Ok(self.format_default(value)),
        }
    }

    fn number_pattern(&mut self, pattern: &str) -> Result<&NumberPattern, FormatError> {
        if !self.number_patterns.contains_key(pattern) {
            let parsed = NumberPattern::parse(pattern)?;
            trace!(pattern; "Cached number pattern");
            self.number_patterns.insert(pattern.to_string(), parsed);
        }
        self.number_patterns
            .get(pattern)
            .ok_or_else(|| FormatError::NumberPattern(pattern.to_string()))
    }
}

impl Default for ValueFormatter {
    fn default() -> Self {
        Self::new(Locale::default(), "")
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    #[test]
    fn test_default_rendering() {
        let formatter = ValueFormatter::new(Locale::new(',', '.'), "n/a");
        assert_eq!(formatter.format_default(&Value::Number(42.0)), "42");
        assert_eq!(formatter.format_default(&Value::Number(2.5)), "2,5");
        assert_eq!(formatter.format_default(&Value::Null), "n/a");
        assert_eq!(formatter.format_default(&Value::from("East")), "East");
    }

    #[test]
    fn test_number_pattern_cache() {
        let mut formatter = ValueFormatter::default();
        let first = formatter.format_number(&Value::Number(1234.5), Some("#,##0.00"));
        let second = formatter.format_number(&Value::Number(10.0), Some("#,##0.00"));

        assert_eq!(first, Ok("1,234.50".to_string()));
        assert_eq!(second, Ok("10.00".to_string()));
        assert_eq!(formatter.cached_patterns(), 1);
    }

    #[test]
    fn test_number_from_text() {
        let mut formatter = ValueFormatter::default();
        assert_eq!(
            formatter.format_number(&Value::from("0.5"), Some("0%")),
            Ok("50%".to_string())
        );
        assert!(matches!(
            formatter.format_number(&Value::from("East"), None),
            Err(FormatError::ValueType { .. })
        ));
    }

    #[test]
    fn test_format_date_values() {
        let formatter = ValueFormatter::default();
        let date = NaiveDate::from_ymd_opt(2023, 12, 24)
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .expect("valid date");

        assert_eq!(
            formatter.format_date(&Value::Date(date), "%Y/%m/%d"),
            Ok("2023/12/24".to_string())
        );
        assert_eq!(
            formatter.format_date(&Value::from("2023-12-24"), "%d.%m."),
            Ok("24.12.".to_string())
        );
        assert!(formatter.format_date(&Value::Number(1.0), "%Y").is_err());
    }

    #[test]
    fn test_format_field() {
        let mut formatter = ValueFormatter::default();
        assert_eq!(
            formatter.format_field(&Value::Number(0.125), Some("0.0%")),
            Ok("12.5%".to_string())
        );
        assert_eq!(
            formatter.format_field(&Value::from("East"), Some("0.0")),
            Ok("East".to_string())
        );
        assert!(formatter.format_field(&Value::Number(1.0), Some("x")).is_err());
    }
}
