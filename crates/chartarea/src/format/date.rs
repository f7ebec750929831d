use std::fmt::Write;

use chrono::{
    NaiveDate, NaiveDateTime,
    format::{Item, StrftimeItems},
};

use crate::error::FormatError;

/// Formats `date` with a strftime pattern.
///
/// # Errors
///
/// Returns [`FormatError::DatePattern`] when the pattern has an unknown
/// specifier or asks for data a naive date-time does not have, such as a
/// time zone offset.
pub fn format_date(date: &NaiveDateTime, pattern: &str) -> Result<String, FormatError> {
    let items: Vec<Item<'_>> = StrftimeItems::new(pattern).collect();
    if items.iter().any(|item| matches!(item, Item::Error)) {
        return Err(FormatError::DatePattern(pattern.to_string()));
    }

    let mut out = String::new();
    write!(out, "{}", date.format_with_items(items.iter()))
        .map_err(|_| FormatError::DatePattern(pattern.to_string()))?;
    Ok(out)
}

/// Reads a date from its ISO text form, with or without a time part.
pub fn parse_date(text: &str) -> Option<NaiveDateTime> {
    let text = text.trim();
    NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S"))
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(text, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
}
