//! Error types for Chartarea operations.
//!
//! Assembly itself never fails: format problems degrade to placeholder text
//! and missing input degrades to empty areas. [`FormatError`] is returned by
//! the pattern and template parsers; the builder facade only fails while
//! decoding an encoded area tree.

use thiserror::Error;

/// The main error type for Chartarea operations.
#[derive(Debug, Error)]
pub enum ChartAreaError {
    #[error("Decode error: {0}")]
    Decode(#[from] DecodeError),
}

/// Errors raised while reading an encoded area tree.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DecodeError {
    #[error("not a chart area stream (invalid magic header)")]
    InvalidMagic,

    #[error("unsupported wire version {0}")]
    UnsupportedVersion(u16),

    #[error("unexpected end of data at byte {0}")]
    UnexpectedEnd(usize),

    #[error("invalid {what} tag 0x{tag:02X}")]
    InvalidTag { what: &'static str, tag: u8 },

    #[error("invalid UTF-8 in palette entry {0}")]
    InvalidString(usize),

    #[error("palette entry {0} is empty")]
    EmptyString(usize),

    #[error("palette entry {0} repeats an earlier entry")]
    DuplicateString(usize),

    #[error("length prefix {declared} does not match payload length {actual}")]
    LengthMismatch { declared: usize, actual: usize },
}

/// Errors raised while parsing number or date patterns and tooltip templates.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FormatError {
    #[error("invalid number pattern `{0}`")]
    NumberPattern(String),

    #[error("invalid date pattern `{0}`")]
    DatePattern(String),

    #[error("value `{value}` cannot be formatted as {expected}")]
    ValueType {
        value: String,
        expected: &'static str,
    },

    #[error("invalid tooltip template at offset {offset}: {reason}")]
    Template { offset: usize, reason: &'static str },
}
