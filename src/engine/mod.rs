//! # Engine Collaborator
//!
//! The shell never interprets queries itself. Everything beyond splitting
//! input and formatting output is delegated to an [`Engine`]: statement
//! execution, raw SQL, CSV import, codebooks, entity description and
//! generator guessing.
//!
//! ## Contract
//!
//! ```text
//! ┌──────────────┐   execute / sql / describe   ┌────────────────────┐
//! │   Dispatcher │ ───────────────────────────▶ │       Engine       │
//! │  + handlers  │ ◀─────────────────────────── │ (SqliteEngine, …)  │
//! └──────────────┘   ResultSet | EngineError    └────────────────────┘
//! ```
//!
//! Every call is synchronous and returns either a value or an
//! [`EngineError`]. The shell wraps engine errors as domain errors and keeps
//! going; an engine must leave itself usable after any failed call.
//!
//! ## SQL Tracing
//!
//! Engines record the SQL they issue while tracing is enabled. The shell
//! drains the log after each call and prints it, so tracing output stays in
//! order with the results it belongs to.
//!
//! ## Module Organization
//!
//! - `value`: `Value` cells and the `ResultSet` table shape
//! - `sqlite`: reference engine backed by SQLite

pub mod sqlite;
pub mod value;

pub use sqlite::SqliteEngine;
pub use value::{ResultSet, Value, NULL_PLACEHOLDER};

use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("No such generator: {0}")]
    NoSuchGenerator(String),

    #[error("No such table: {0}")]
    NoSuchTable(String),

    #[error("No such column in table {table}: {column}")]
    NoSuchColumn { table: String, column: String },

    #[error("Table already exists: {0}")]
    TableExists(String),

    #[error("Generator already exists: {0}")]
    GeneratorExists(String),

    #[error("{0} is not supported by this engine")]
    Unsupported(String),

    #[error("malformed result: row {row} has {found} cells, expected {expected}")]
    Shape {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("invalid CSV file {}: {reason}", path.display())]
    InvalidCsv { path: PathBuf, reason: String },

    #[error("SQL error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("invalid value map: {0}")]
    Json(#[from] serde_json::Error),

    #[error("cannot open {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Entity kinds understood by `.describe`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DescribeKind {
    Tables,
    Generators,
    Columns,
    Models,
}

impl DescribeKind {
    pub fn parse(word: &str) -> Option<Self> {
        match word.to_lowercase().as_str() {
            "table" | "tables" => Some(Self::Tables),
            "generator" | "generators" => Some(Self::Generators),
            "column" | "columns" => Some(Self::Columns),
            "model" | "models" => Some(Self::Models),
            _ => None,
        }
    }

    /// Columns and models describe exactly one generator.
    pub fn needs_single_target(self) -> bool {
        matches!(self, Self::Columns | Self::Models)
    }
}

pub trait Engine {
    /// Executes one query-language statement, exactly as typed.
    fn execute(&mut self, statement: &str) -> Result<ResultSet, EngineError>;

    /// Executes raw SQL against the underlying store.
    fn sql(&mut self, statement: &str) -> Result<ResultSet, EngineError>;

    /// Evaluates a scalar expression.
    fn evaluate(&mut self, expression: &str) -> Result<Value, EngineError>;

    fn import_csv(&mut self, table: &str, path: &Path) -> Result<(), EngineError>;

    fn load_codebook(&mut self, table: &str, path: &Path) -> Result<(), EngineError>;

    fn describe(&mut self, kind: DescribeKind, targets: &[&str]) -> Result<ResultSet, EngineError>;

    fn guess_generator(&mut self, generator: &str, table: &str) -> Result<(), EngineError>;

    fn load_legacy_models(
        &mut self,
        generator: &str,
        table: &str,
        path: &Path,
    ) -> Result<(), EngineError>;

    fn set_sql_trace(&mut self, enabled: bool);

    /// Returns and clears the SQL recorded since the last drain.
    fn drain_sql_trace(&mut self) -> Vec<String>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn describe_kind_accepts_singular_and_plural() {
        assert_eq!(DescribeKind::parse("tables"), Some(DescribeKind::Tables));
        assert_eq!(DescribeKind::parse("generator"), Some(DescribeKind::Generators));
        assert_eq!(DescribeKind::parse("COLUMNS"), Some(DescribeKind::Columns));
        assert_eq!(DescribeKind::parse("models"), Some(DescribeKind::Models));
        assert_eq!(DescribeKind::parse("widgets"), None);
    }

    #[test]
    fn no_such_generator_message_names_the_generator() {
        let err = EngineError::NoSuchGenerator("dha".to_string());
        assert_eq!(err.to_string(), "No such generator: dha");
    }
}
