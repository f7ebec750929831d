//! Tabular data behind a chart.
//!
//! The query layer hands over a [`DataSet`]: an ordered set of [`Field`]
//! descriptors and rows of [`Value`]s addressed by field name. Fields carry
//! their role (dimension or measure), an optional display format and any
//! hyperlink definitions attached to them.

use std::fmt;

use chrono::{NaiveDateTime, Timelike};
use indexmap::IndexMap;
use serde::Deserialize;

/// A single cell of the data set.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Value {
    #[default]
    Null,
    Number(f64),
    Text(String),
    Date(NaiveDateTime),
    Bool(bool),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Returns the numeric value, parsing text when possible.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(number) => Some(*number),
            Self::Text(text) => text.trim().parse().ok(),
            Self::Bool(flag) => Some(if *flag { 1.0 } else { 0.0 }),
            Self::Null | Self::Date(_) => None,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Number(_) => "number",
            Self::Text(_) => "text",
            Self::Date(_) => "date",
            Self::Bool(_) => "bool",
        }
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<NaiveDateTime> for Value {
    fn from(value: NaiveDateTime) -> Self {
        Self::Date(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => Ok(()),
            Self::Number(number) => write!(f, "{number}"),
            Self::Text(text) => f.write_str(text),
            Self::Date(date) if date.time().num_seconds_from_midnight() == 0 => {
                write!(f, "{}", date.format("%Y-%m-%d"))
            }
            Self::Date(date) => write!(f, "{}", date.format("%Y-%m-%d %H:%M:%S")),
            Self::Bool(flag) => write!(f, "{flag}"),
        }
    }
}

/// Whether a field groups rows or is aggregated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldRole {
    #[default]
    Dimension,
    Measure,
}

/// A parameter passed to a hyperlink target.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct LinkParam {
    /// Parameter name at the target.
    pub name: String,
    /// Field the value is read from.
    pub field: String,
    /// The link is meaningless without this parameter.
    pub required: bool,
}

impl LinkParam {
    pub fn new(name: impl Into<String>, field: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            field: field.into(),
            required: false,
        }
    }

    /// Marks the parameter as required (builder style).
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }
}

/// A hyperlink (or drill-through) definition attached to a field.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct HyperlinkDef {
    pub label: String,
    pub target: String,
    pub params: Vec<LinkParam>,
    pub include_session_variables: bool,
    pub include_selection: bool,
}

impl HyperlinkDef {
    pub fn new(label: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            target: target.into(),
            ..Self::default()
        }
    }

    pub fn with_param(mut self, param: LinkParam) -> Self {
        self.params.push(param);
        self
    }
}

/// Description of one column of the data set.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct Field {
    pub name: String,
    pub role: FieldRole,
    /// Number or date pattern used for display.
    pub format: Option<String>,
    /// Caption shown instead of the name.
    pub label: Option<String>,
    pub hyperlinks: Vec<HyperlinkDef>,
}

impl Field {
    pub fn dimension(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            role: FieldRole::Dimension,
            ..Self::default()
        }
    }

    pub fn measure(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            role: FieldRole::Measure,
            ..Self::default()
        }
    }

    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = Some(format.into());
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_hyperlink(mut self, link: HyperlinkDef) -> Self {
        self.hyperlinks.push(link);
        self
    }

    /// Returns the caption used as a tooltip key.
    pub fn caption(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.name)
    }

    pub fn is_measure(&self) -> bool {
        self.role == FieldRole::Measure
    }
}

/// Rows of values addressed by field name.
///
/// Each row holds one value per field, in field order. Missing trailing
/// cells read as [`Value::Null`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DataSet {
    fields: IndexMap<String, Field>,
    rows: Vec<Vec<Value>>,
}

impl DataSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a field (builder style). A field with the same name is replaced.
    pub fn with_field(mut self, field: Field) -> Self {
        self.fields.insert(field.name.clone(), field);
        self
    }

    /// Appends a row (builder style).
    pub fn with_row(mut self, row: Vec<Value>) -> Self {
        self.rows.push(row);
        self
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.get(name)
    }

    pub fn fields(&self) -> impl Iterator<Item = &Field> {
        self.fields.values()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Returns the value of `field` in `row`.
    ///
    /// Unknown fields and rows out of range yield `None`; a short row yields
    /// [`Value::Null`].
    pub fn value(&self, row: usize, field: &str) -> Option<&Value> {
        let column = self.fields.get_index_of(field)?;
        let cells = self.rows.get(row)?;
        Some(cells.get(column).unwrap_or(&Value::Null))
    }

    /// Returns every row index whose values for `fields` equal those of
    /// `row`.
    pub fn rows_matching(&self, row: usize, fields: &[String]) -> Vec<usize> {
        (0..self.rows.len())
            .filter(|&candidate| {
                fields
                    .iter()
                    .all(|field| self.value(candidate, field) == self.value(row, field))
            })
            .collect()
    }
}
