//! # Result Values
//!
//! `Value` is the owned cell type that crosses the engine boundary, and
//! `ResultSet` is the tabular shape every query-like engine call returns.
//!
//! ## Display
//!
//! The renderer only ever sees values through their `Display` form:
//!
//! | Value        | Rendered as                          |
//! |--------------|--------------------------------------|
//! | `Null`       | `None`                               |
//! | `Integer(7)` | `7`                                  |
//! | `Real(3.0)`  | `3.0` (shortest round-trip form)     |
//! | `Text(s)`    | `s` unchanged                        |
//! | `Blob(b)`    | `x'DEADBEEF'`, truncated past 16 B   |
//!
//! ## Shape Invariant
//!
//! A `ResultSet` can only be built through [`ResultSet::new`], which rejects
//! any row whose cell count differs from the column count. Downstream code
//! (the table formatter in particular) relies on this and never re-checks.

use super::EngineError;
use std::fmt;

pub const NULL_PLACEHOLDER: &str = "None";
const BLOB_PREVIEW_BYTES: usize = 16;

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
    Blob(Vec<u8>),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, Value::Integer(_) | Value::Real(_))
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str(NULL_PLACEHOLDER),
            Value::Integer(i) => write!(f, "{}", i),
            Value::Real(r) => write!(f, "{:?}", r),
            Value::Text(s) => f.write_str(s),
            Value::Blob(b) => f.write_str(&format_blob(b)),
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Integer(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Real(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(Value::Null)
    }
}

fn format_blob(bytes: &[u8]) -> String {
    if bytes.len() <= BLOB_PREVIEW_BYTES {
        let hex: String = bytes.iter().map(|b| format!("{:02X}", b)).collect();
        format!("x'{}'", hex)
    } else {
        let hex: String = bytes[..BLOB_PREVIEW_BYTES]
            .iter()
            .map(|b| format!("{:02X}", b))
            .collect();
        format!("x'{}'... ({} bytes)", hex, bytes.len())
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ResultSet {
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
}

impl ResultSet {
    pub fn new(columns: Vec<String>, rows: Vec<Vec<Value>>) -> Result<Self, EngineError> {
        if let Some((row, cells)) = rows
            .iter()
            .enumerate()
            .find(|(_, cells)| cells.len() != columns.len())
        {
            return Err(EngineError::Shape {
                row,
                expected: columns.len(),
                found: cells.len(),
            });
        }
        Ok(Self { columns, rows })
    }

    /// A result with no columns; statements that return nothing produce this.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn has_columns(&self) -> bool {
        !self.columns.is_empty()
    }

    pub fn first_value(&self) -> Option<&Value> {
        self.rows.first().and_then(|row| row.first())
    }

    /// Appends the rows of a result with the same column layout.
    pub(crate) fn extend(&mut self, other: ResultSet) -> Result<(), EngineError> {
        if self.columns.is_empty() {
            *self = other;
            return Ok(());
        }
        if let Some(cells) = other.rows.iter().find(|cells| cells.len() != self.columns.len()) {
            return Err(EngineError::Shape {
                row: self.rows.len(),
                expected: self.columns.len(),
                found: cells.len(),
            });
        }
        self.rows.extend(other.rows);
        Ok(())
    }
}
