//! Field definitions and value handling.
//!
//! Field values live in the form-data blob as JSON values. Each
//! [`FieldSpec`] knows how to parse prompt input into its value, how to
//! validate a value, and whether a value counts as filled in.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{FimsError, Result};

/// Storage format for date fields.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// A single input on a wizard step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldSpec {
    /// Column / blob key.
    pub key: String,

    /// English label.
    pub label: String,

    /// Local-language label shown alongside the English one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label_local: Option<String>,

    /// Whether the step guard requires a value.
    #[serde(default)]
    pub required: bool,

    /// Input kind.
    #[serde(flatten)]
    pub kind: FieldKind,
}

/// The kind of input a field accepts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FieldKind {
    /// Free text.
    Text,
    /// Numeric value.
    Number,
    /// Yes/no checkbox.
    Bool,
    /// Calendar date, stored as `YYYY-MM-DD`.
    Date,
    /// One of a fixed list of options.
    Select { options: Vec<String> },
    /// Repeating rows of sub-fields.
    Table {
        columns: Vec<FieldSpec>,
        max_rows: usize,
    },
}

impl FieldSpec {
    /// Create a field (used for the fields shared by every form).
    pub fn new(key: &str, label: &str, label_local: &str, kind: FieldKind) -> Self {
        Self {
            key: key.to_string(),
            label: label.to_string(),
            label_local: Some(label_local.to_string()),
            required: false,
            kind,
        }
    }

    /// Mark the field as required.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Bilingual display label.
    pub fn display_label(&self) -> String {
        match &self.label_local {
            Some(local) if !local.is_empty() => format!("{} / {}", self.label, local),
            _ => self.label.clone(),
        }
    }

    /// Value a fresh form starts with.
    pub fn initial_value(&self) -> Value {
        match &self.kind {
            FieldKind::Bool => Value::Bool(false),
            FieldKind::Table { .. } => Value::Array(Vec::new()),
            _ => Value::Null,
        }
    }

    /// Whether this field is a boolean checkbox.
    pub fn is_bool(&self) -> bool {
        matches!(self.kind, FieldKind::Bool)
    }

    /// Whether this field is a date.
    pub fn is_date(&self) -> bool {
        matches!(self.kind, FieldKind::Date)
    }

    /// Parse raw prompt input into a value for this field.
    ///
    /// Empty input yields `null` for scalar kinds. Table fields are not
    /// entered as a single string and must be set row by row.
    pub fn parse_input(&self, input: &str) -> Result<Value> {
        let input = input.trim();
        let value = match &self.kind {
            FieldKind::Text => {
                if input.is_empty() {
                    Value::Null
                } else {
                    Value::String(input.to_string())
                }
            }
            FieldKind::Date => {
                if input.is_empty() {
                    Value::Null
                } else {
                    let date = NaiveDate::parse_from_str(input, DATE_FORMAT)
                        .map_err(|_| self.invalid("expected a date as YYYY-MM-DD"))?;
                    Value::String(date.format(DATE_FORMAT).to_string())
                }
            }
            FieldKind::Select { .. } => {
                if input.is_empty() {
                    Value::Null
                } else {
                    Value::String(input.to_string())
                }
            }
            FieldKind::Number => {
                if input.is_empty() {
                    Value::Null
                } else {
                    let n: f64 = input.parse().map_err(|_| self.invalid("expected a number"))?;
                    number_value(n).ok_or_else(|| self.invalid("expected a finite number"))?
                }
            }
            FieldKind::Bool => match input.to_lowercase().as_str() {
                "true" | "yes" | "y" | "1" | "ho" | "होय" => Value::Bool(true),
                "false" | "no" | "n" | "0" | "nahi" | "नाही" | "" => Value::Bool(false),
                _ => return Err(self.invalid("expected yes or no")),
            },
            FieldKind::Table { .. } => {
                return Err(self.invalid("table fields are entered row by row"));
            }
        };

        self.validate(&value)?;
        Ok(value)
    }

    /// Check that a value has the right shape for this field.
    pub fn validate(&self, value: &Value) -> Result<()> {
        match (&self.kind, value) {
            (FieldKind::Table { .. }, Value::Null) => Ok(()),
            (FieldKind::Table { columns, max_rows }, Value::Array(rows)) => {
                if rows.len() > *max_rows {
                    return Err(self.invalid(&format!("at most {} rows allowed", max_rows)));
                }
                for row in rows {
                    let cells = row
                        .as_object()
                        .ok_or_else(|| self.invalid("each row must be an object"))?;
                    for column in columns {
                        if let Some(cell) = cells.get(&column.key) {
                            column.validate(cell)?;
                        }
                    }
                }
                Ok(())
            }
            (_, Value::Null) => Ok(()),
            (FieldKind::Text, Value::String(_)) => Ok(()),
            (FieldKind::Number, Value::Number(_)) => Ok(()),
            (FieldKind::Bool, Value::Bool(_)) => Ok(()),
            (FieldKind::Date, Value::String(s)) => {
                if s.is_empty() || NaiveDate::parse_from_str(s, DATE_FORMAT).is_ok() {
                    Ok(())
                } else {
                    Err(self.invalid("expected a date as YYYY-MM-DD"))
                }
            }
            (FieldKind::Select { options }, Value::String(s)) => {
                if s.is_empty() || options.iter().any(|o| o == s) {
                    Ok(())
                } else {
                    Err(self.invalid(&format!("expected one of: {}", options.join(", "))))
                }
            }
            _ => Err(self.invalid("wrong value type")),
        }
    }

    /// Whether a value satisfies a `required` guard.
    ///
    /// Booleans always count as filled; a table needs at least one row with
    /// every required column filled.
    pub fn is_filled(&self, value: Option<&Value>) -> bool {
        let Some(value) = value else {
            return false;
        };
        match (&self.kind, value) {
            (FieldKind::Table { columns, .. }, Value::Array(rows)) => {
                !rows.is_empty()
                    && rows.iter().all(|row| {
                        columns
                            .iter()
                            .filter(|c| c.required)
                            .all(|c| c.is_filled(row.get(&c.key)))
                    })
            }
            (_, Value::Null) => false,
            (_, Value::String(s)) => !s.trim().is_empty(),
            (_, Value::Array(items)) => !items.is_empty(),
            _ => true,
        }
    }

    /// Render a value for display.
    pub fn display_value(&self, value: Option<&Value>) -> String {
        match value {
            None | Some(Value::Null) => String::new(),
            Some(Value::Bool(true)) => "yes".to_string(),
            Some(Value::Bool(false)) => "no".to_string(),
            Some(Value::String(s)) => s.clone(),
            Some(Value::Number(n)) => n.to_string(),
            Some(Value::Array(rows)) => format!("{} row(s)", rows.len()),
            Some(other) => other.to_string(),
        }
    }

    /// Build an empty row for a table field.
    pub fn empty_row(&self) -> Map<String, Value> {
        let mut row = Map::new();
        if let FieldKind::Table { columns, .. } = &self.kind {
            for column in columns {
                row.insert(column.key.clone(), column.initial_value());
            }
        }
        row
    }

    fn invalid(&self, message: &str) -> FimsError {
        FimsError::InvalidField {
            key: self.key.clone(),
            message: message.to_string(),
        }
    }
}

/// Convert a float into a JSON number, keeping whole numbers integral.
pub fn number_value(n: f64) -> Option<Value> {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        Some(Value::from(n as i64))
    } else {
        serde_json::Number::from_f64(n).map(Value::Number)
    }
}
