//! # SQLite Reference Engine
//!
//! `SqliteEngine` implements the [`Engine`] contract on top of a single
//! SQLite connection. It keeps BayesDB-style metadata in ordinary tables
//! next to the user's data:
//!
//! ```text
//! bayesdb_column            (tabname, colno) → name, shortname, description
//! bayesdb_column_map        (tabname, colno, key) → value
//! bayesdb_generator         id → name, tabname, metamodel
//! bayesdb_generator_column  (generator_id, colno) → stattype
//! bayesdb_generator_model   (generator_id, modelno) → iterations
//! ```
//!
//! ## Statements
//!
//! Query-language statements are handed to SQLite unchanged, so the shell
//! can run any `SELECT` against imported tables. `.sql` takes the same path;
//! the distinction only matters for engines with their own language.
//! A unit holding several statements runs all of them in order and returns
//! the rows of the last; empty statements are skipped.
//!
//! ## Guessing
//!
//! `guess_generator` assigns a statistical type to every column of a table:
//!
//! - all values NULL: ignored
//! - non-numeric and every value distinct: treated as a key, ignored
//! - numeric with more than `NUMERICAL_DISTINCT_CUTOFF` distinct values: numerical
//! - anything else: categorical
//!
//! Ignored columns get no row in `bayesdb_generator_column` and therefore
//! do not appear in `.describe columns`.
//!
//! ## Transactions
//!
//! Multi-statement operations (CSV import, codebooks, guessing) run inside a
//! transaction so a failure leaves no half-imported table behind.

use super::{DescribeKind, Engine, EngineError, ResultSet, Value};
use rusqlite::types::{ToSql, ToSqlOutput, ValueRef};
use rusqlite::{params, params_from_iter, Batch, Connection, OptionalExtension, Statement};
use serde::Deserialize;
use std::collections::{BTreeMap, HashSet};
use std::fs::File;
use std::path::Path;

const NUMERICAL_DISTINCT_CUTOFF: usize = 20;
const GUESS_METAMODEL: &str = "heuristic";

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS bayesdb_column (
    tabname TEXT NOT NULL,
    colno INTEGER NOT NULL,
    name TEXT NOT NULL,
    shortname TEXT,
    description TEXT,
    PRIMARY KEY(tabname, colno)
);
CREATE TABLE IF NOT EXISTS bayesdb_column_map (
    tabname TEXT NOT NULL,
    colno INTEGER NOT NULL,
    key TEXT NOT NULL,
    value TEXT NOT NULL,
    PRIMARY KEY(tabname, colno, key)
);
CREATE TABLE IF NOT EXISTS bayesdb_generator (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL UNIQUE,
    tabname TEXT NOT NULL,
    metamodel TEXT NOT NULL
);
CREATE TABLE IF NOT EXISTS bayesdb_generator_column (
    generator_id INTEGER NOT NULL REFERENCES bayesdb_generator(id),
    colno INTEGER NOT NULL,
    stattype TEXT NOT NULL,
    PRIMARY KEY(generator_id, colno)
);
CREATE TABLE IF NOT EXISTS bayesdb_generator_model (
    generator_id INTEGER NOT NULL REFERENCES bayesdb_generator(id),
    modelno INTEGER NOT NULL,
    iterations INTEGER NOT NULL DEFAULT 0,
    PRIMARY KEY(generator_id, modelno)
);
"#;

const TABLE_EXISTS_SQL: &str =
    "SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1 COLLATE NOCASE";
const COLUMN_LIST_SQL: &str = "SELECT colno, name FROM bayesdb_column \
     WHERE tabname = ?1 COLLATE NOCASE ORDER BY colno";
const INSERT_COLUMN_SQL: &str =
    "INSERT INTO bayesdb_column (tabname, colno, name) VALUES (?1, ?2, ?3)";
const GENERATOR_ID_SQL: &str = "SELECT id FROM bayesdb_generator WHERE name = ?1 COLLATE NOCASE";

const DESCRIBE_ALL_TABLES_SQL: &str = "SELECT tabname, COUNT(*) AS ncolumns FROM bayesdb_column \
     GROUP BY tabname ORDER BY tabname";
const DESCRIBE_TABLE_SQL: &str = "SELECT tabname, COUNT(*) AS ncolumns FROM bayesdb_column \
     WHERE tabname = ?1 COLLATE NOCASE GROUP BY tabname";
const DESCRIBE_ALL_GENERATORS_SQL: &str =
    "SELECT id, name, tabname, metamodel FROM bayesdb_generator ORDER BY id";
const DESCRIBE_GENERATOR_SQL: &str =
    "SELECT id, name, tabname, metamodel FROM bayesdb_generator WHERE id = ?1";
const DESCRIBE_COLUMNS_SQL: &str = "SELECT c.colno AS colno, c.name AS name, \
     gc.stattype AS stattype, c.shortname AS shortname \
     FROM bayesdb_generator AS g \
     JOIN bayesdb_generator_column AS gc ON gc.generator_id = g.id \
     JOIN bayesdb_column AS c ON c.tabname = g.tabname COLLATE NOCASE AND c.colno = gc.colno \
     WHERE g.id = ?1 ORDER BY c.colno";
const DESCRIBE_MODELS_SQL: &str = "SELECT modelno, iterations FROM bayesdb_generator_model \
     WHERE generator_id = ?1 ORDER BY modelno";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatType {
    Numerical,
    Categorical,
}

impl StatType {
    pub fn as_str(self) -> &'static str {
        match self {
            StatType::Numerical => "numerical",
            StatType::Categorical => "categorical",
        }
    }
}

#[derive(Debug, Default)]
struct SqlTrace {
    entries: Option<Vec<String>>,
}

impl SqlTrace {
    fn record(&mut self, sql: &str) {
        if let Some(entries) = self.entries.as_mut() {
            entries.push(sql.split_whitespace().collect::<Vec<_>>().join(" "));
        }
    }
}

#[derive(Debug, Deserialize)]
struct CodebookEntry {
    #[serde(alias = "column_label")]
    name: String,
    #[serde(default, alias = "short_name")]
    shortname: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    value_map: Option<String>,
}

pub struct SqliteEngine {
    conn: Connection,
    trace: SqlTrace,
}

impl SqliteEngine {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, EngineError> {
        Self::with_connection(Connection::open(path)?)
    }

    pub fn open_in_memory() -> Result<Self, EngineError> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self, EngineError> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn,
            trace: SqlTrace::default(),
        })
    }

    fn generator_required(&mut self, name: &str) -> Result<i64, EngineError> {
        generator_id(&self.conn, &mut self.trace, name)?
            .ok_or_else(|| EngineError::NoSuchGenerator(name.to_string()))
    }
}

impl Engine for SqliteEngine {
    fn execute(&mut self, statement: &str) -> Result<ResultSet, EngineError> {
        run_query(&self.conn, &mut self.trace, statement, &[])
    }

    fn sql(&mut self, statement: &str) -> Result<ResultSet, EngineError> {
        run_query(&self.conn, &mut self.trace, statement, &[])
    }

    fn evaluate(&mut self, expression: &str) -> Result<Value, EngineError> {
        let result = run_query(
            &self.conn,
            &mut self.trace,
            &format!("SELECT {}", expression),
            &[],
        )?;
        Ok(result.first_value().cloned().unwrap_or(Value::Null))
    }

    fn import_csv(&mut self, table: &str, path: &Path) -> Result<(), EngineError> {
        if table_exists(&self.conn, &mut self.trace, table)? {
            return Err(EngineError::TableExists(table.to_string()));
        }

        let file = File::open(path).map_err(|source| EngineError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(file);
        let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
        validate_headers(path, &headers)?;

        let quoted_table = quote_ident(table);
        let columns = headers
            .iter()
            .map(|h| quote_ident(h))
            .collect::<Vec<_>>()
            .join(", ");

        let tx = self.conn.transaction()?;
        run_exec(
            &tx,
            &mut self.trace,
            &format!("CREATE TABLE {} ({})", quoted_table, columns),
            &[],
        )?;
        for (colno, name) in headers.iter().enumerate() {
            run_exec(
                &tx,
                &mut self.trace,
                INSERT_COLUMN_SQL,
                params![table, colno as i64, name],
            )?;
        }

        {
            let placeholders = (1..=headers.len())
                .map(|i| format!("?{}", i))
                .collect::<Vec<_>>()
                .join(", ");
            let insert = format!(
                "INSERT INTO {} ({}) VALUES ({})",
                quoted_table, columns, placeholders
            );
            self.trace.record(&insert);
            let mut stmt = tx.prepare(&insert)?;
            for record in reader.records() {
                let record = record?;
                let values: Vec<Value> = record.iter().map(parse_cell).collect();
                stmt.execute(params_from_iter(values.iter()))?;
            }
        }

        tx.commit()?;
        Ok(())
    }

    fn load_codebook(&mut self, table: &str, path: &Path) -> Result<(), EngineError> {
        let file = File::open(path).map_err(|source| EngineError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(file);
        let entries = reader
            .deserialize::<CodebookEntry>()
            .collect::<Result<Vec<_>, _>>()?;

        let tx = self.conn.transaction()?;
        let columns = ensure_columns(&tx, &mut self.trace, table)?;

        for entry in &entries {
            let colno = columns
                .iter()
                .find(|(_, name)| name.eq_ignore_ascii_case(&entry.name))
                .map(|(colno, _)| *colno)
                .ok_or_else(|| EngineError::NoSuchColumn {
                    table: table.to_string(),
                    column: entry.name.clone(),
                })?;

            run_exec(
                &tx,
                &mut self.trace,
                "UPDATE bayesdb_column SET shortname = ?3, description = ?4 \
                 WHERE tabname = ?1 COLLATE NOCASE AND colno = ?2",
                params![table, colno, entry.shortname, entry.description],
            )?;

            let raw_map = entry
                .value_map
                .as_deref()
                .filter(|m| !m.is_empty() && *m != "NaN");
            if let Some(raw_map) = raw_map {
                let value_map: BTreeMap<String, serde_json::Value> = serde_json::from_str(raw_map)?;
                run_exec(
                    &tx,
                    &mut self.trace,
                    "DELETE FROM bayesdb_column_map WHERE tabname = ?1 COLLATE NOCASE AND colno = ?2",
                    params![table, colno],
                )?;
                for (key, value) in value_map {
                    let value = match value {
                        serde_json::Value::String(s) => s,
                        other => other.to_string(),
                    };
                    run_exec(
                        &tx,
                        &mut self.trace,
                        "INSERT INTO bayesdb_column_map (tabname, colno, key, value) \
                         VALUES (?1, ?2, ?3, ?4)",
                        params![table, colno, key, value],
                    )?;
                }
            }
        }

        tx.commit()?;
        Ok(())
    }

    fn describe(&mut self, kind: DescribeKind, targets: &[&str]) -> Result<ResultSet, EngineError> {
        match kind {
            DescribeKind::Tables if targets.is_empty() => {
                run_query(&self.conn, &mut self.trace, DESCRIBE_ALL_TABLES_SQL, &[])
            }
            DescribeKind::Generators if targets.is_empty() => {
                run_query(&self.conn, &mut self.trace, DESCRIBE_ALL_GENERATORS_SQL, &[])
            }
            DescribeKind::Tables => {
                let mut result = ResultSet::empty();
                for table in targets {
                    let part =
                        run_query(&self.conn, &mut self.trace, DESCRIBE_TABLE_SQL, params![table])?;
                    if part.row_count() == 0 {
                        return Err(EngineError::NoSuchTable(table.to_string()));
                    }
                    result.extend(part)?;
                }
                Ok(result)
            }
            DescribeKind::Generators | DescribeKind::Columns | DescribeKind::Models => {
                let sql = match kind {
                    DescribeKind::Generators => DESCRIBE_GENERATOR_SQL,
                    DescribeKind::Columns => DESCRIBE_COLUMNS_SQL,
                    _ => DESCRIBE_MODELS_SQL,
                };
                let mut result = ResultSet::empty();
                for generator in targets {
                    let id = self.generator_required(generator)?;
                    result.extend(run_query(&self.conn, &mut self.trace, sql, params![id])?)?;
                }
                Ok(result)
            }
        }
    }

    fn guess_generator(&mut self, generator: &str, table: &str) -> Result<(), EngineError> {
        let tx = self.conn.transaction()?;
        if generator_id(&tx, &mut self.trace, generator)?.is_some() {
            return Err(EngineError::GeneratorExists(generator.to_string()));
        }

        let columns = ensure_columns(&tx, &mut self.trace, table)?;
        let mut stattypes = Vec::with_capacity(columns.len());
        for (colno, name) in &columns {
            let values = run_query(
                &tx,
                &mut self.trace,
                &format!("SELECT {} FROM {}", quote_ident(name), quote_ident(table)),
                &[],
            )?;
            let cells: Vec<&Value> = values.rows().iter().filter_map(|row| row.first()).collect();
            if let Some(stattype) = guess_stattype(&cells) {
                stattypes.push((*colno, stattype));
            }
        }

        run_exec(
            &tx,
            &mut self.trace,
            "INSERT INTO bayesdb_generator (name, tabname, metamodel) VALUES (?1, ?2, ?3)",
            params![generator, table, GUESS_METAMODEL],
        )?;
        let id = tx.last_insert_rowid();
        for (colno, stattype) in stattypes {
            run_exec(
                &tx,
                &mut self.trace,
                "INSERT INTO bayesdb_generator_column (generator_id, colno, stattype) \
                 VALUES (?1, ?2, ?3)",
                params![id, colno, stattype.as_str()],
            )?;
        }

        tx.commit()?;
        Ok(())
    }

    fn load_legacy_models(
        &mut self,
        _generator: &str,
        _table: &str,
        _path: &Path,
    ) -> Result<(), EngineError> {
        Err(EngineError::Unsupported("legacy model import".to_string()))
    }

    fn set_sql_trace(&mut self, enabled: bool) {
        self.trace.entries = if enabled {
            Some(self.trace.entries.take().unwrap_or_default())
        } else {
            None
        };
    }

    fn drain_sql_trace(&mut self) -> Vec<String> {
        self.trace
            .entries
            .as_mut()
            .map(std::mem::take)
            .unwrap_or_default()
    }
}

/// Runs every statement in `sql` and returns the last one's rows. Empty
/// statements (a lone `;`) are skipped, so text with nothing to run yields an
/// empty result.
fn run_query(
    conn: &Connection,
    trace: &mut SqlTrace,
    sql: &str,
    params: &[&dyn ToSql],
) -> Result<ResultSet, EngineError> {
    trace.record(sql);
    let mut batch = Batch::new(conn, sql);
    let mut last = ResultSet::empty();
    while let Some(mut stmt) = batch.next()? {
        last = collect_rows(&mut stmt, params)?;
    }
    Ok(last)
}

fn collect_rows(stmt: &mut Statement<'_>, params: &[&dyn ToSql]) -> Result<ResultSet, EngineError> {
    let columns: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();
    let width = columns.len();

    let mut rows = Vec::new();
    let mut cursor = stmt.query(params)?;
    while let Some(row) = cursor.next()? {
        let mut cells = Vec::with_capacity(width);
        for i in 0..width {
            cells.push(Value::from(row.get_ref(i)?));
        }
        rows.push(cells);
    }

    ResultSet::new(columns, rows)
}

fn run_exec(
    conn: &Connection,
    trace: &mut SqlTrace,
    sql: &str,
    params: &[&dyn ToSql],
) -> Result<usize, EngineError> {
    trace.record(sql);
    Ok(conn.execute(sql, params)?)
}

fn table_exists(conn: &Connection, trace: &mut SqlTrace, table: &str) -> Result<bool, EngineError> {
    trace.record(TABLE_EXISTS_SQL);
    Ok(conn
        .query_row(TABLE_EXISTS_SQL, params![table], |_| Ok(()))
        .optional()?
        .is_some())
}

fn generator_id(
    conn: &Connection,
    trace: &mut SqlTrace,
    name: &str,
) -> Result<Option<i64>, EngineError> {
    trace.record(GENERATOR_ID_SQL);
    Ok(conn
        .query_row(GENERATOR_ID_SQL, params![name], |row| row.get(0))
        .optional()?)
}

fn column_list(
    conn: &Connection,
    trace: &mut SqlTrace,
    table: &str,
) -> Result<Vec<(i64, String)>, EngineError> {
    let result = run_query(conn, trace, COLUMN_LIST_SQL, params![table])?;
    Ok(result
        .rows()
        .iter()
        .filter_map(|row| match (&row[0], &row[1]) {
            (Value::Integer(colno), Value::Text(name)) => Some((*colno, name.clone())),
            _ => None,
        })
        .collect())
}

/// Returns the registered columns of `table`, registering them from the
/// SQLite schema first when the table was created outside `.csv`.
fn ensure_columns(
    conn: &Connection,
    trace: &mut SqlTrace,
    table: &str,
) -> Result<Vec<(i64, String)>, EngineError> {
    let registered = column_list(conn, trace, table)?;
    if !registered.is_empty() {
        return Ok(registered);
    }
    if !table_exists(conn, trace, table)? {
        return Err(EngineError::NoSuchTable(table.to_string()));
    }

    let info = run_query(
        conn,
        trace,
        &format!("PRAGMA table_info({})", quote_ident(table)),
        &[],
    )?;
    for row in info.rows() {
        if let (Value::Integer(cid), Value::Text(name)) = (&row[0], &row[1]) {
            run_exec(conn, trace, INSERT_COLUMN_SQL, params![table, cid, name])?;
        }
    }
    column_list(conn, trace, table)
}

fn validate_headers(path: &Path, headers: &[String]) -> Result<(), EngineError> {
    let invalid = |reason: String| EngineError::InvalidCsv {
        path: path.to_path_buf(),
        reason,
    };

    if headers.is_empty() {
        return Err(invalid("missing header row".to_string()));
    }
    let mut seen = HashSet::new();
    for (i, header) in headers.iter().enumerate() {
        if header.is_empty() {
            return Err(invalid(format!("column {} has an empty name", i)));
        }
        if !seen.insert(header.to_lowercase()) {
            return Err(invalid(format!("duplicate column name: {}", header)));
        }
    }
    Ok(())
}

fn parse_cell(raw: &str) -> Value {
    if raw.is_empty() {
        return Value::Null;
    }
    if let Ok(i) = raw.parse::<i64>() {
        return Value::Integer(i);
    }
    match raw.parse::<f64>() {
        Ok(f) if f.is_finite() => Value::Real(f),
        _ => Value::Text(raw.to_string()),
    }
}

fn guess_stattype(values: &[&Value]) -> Option<StatType> {
    let present: Vec<&Value> = values.iter().copied().filter(|v| !v.is_null()).collect();
    if present.is_empty() {
        return None;
    }

    let numeric = present.iter().all(|v| v.is_numeric());
    let distinct: HashSet<String> = present.iter().map(|v| v.to_string()).collect();

    if !numeric && distinct.len() == present.len() {
        None
    } else if numeric && distinct.len() > NUMERICAL_DISTINCT_CUTOFF {
        Some(StatType::Numerical)
    } else {
        Some(StatType::Categorical)
    }
}

fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

impl From<ValueRef<'_>> for Value {
    fn from(value: ValueRef<'_>) -> Self {
        match value {
            ValueRef::Null => Value::Null,
            ValueRef::Integer(i) => Value::Integer(i),
            ValueRef::Real(f) => Value::Real(f),
            ValueRef::Text(t) => Value::Text(String::from_utf8_lossy(t).into_owned()),
            ValueRef::Blob(b) => Value::Blob(b.to_vec()),
        }
    }
}

impl ToSql for Value {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(match self {
            Value::Null => ToSqlOutput::Owned(rusqlite::types::Value::Null),
            Value::Integer(i) => ToSqlOutput::from(*i),
            Value::Real(f) => ToSqlOutput::from(*f),
            Value::Text(s) => ToSqlOutput::from(s.as_str()),
            Value::Blob(b) => ToSqlOutput::from(b.as_slice()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::tempdir;

    fn write_file(dir: &Path, name: &str, contents: &str) -> std::path::PathBuf {
        let path = dir.join(name);
        let mut file = File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        path
    }

    fn cities_csv(dir: &Path) -> std::path::PathBuf {
        let mut contents = String::from("name,population,region\n");
        for i in 0..30 {
            contents.push_str(&format!("City {},{},{}\n", i, 1000 + i * 37, i % 3));
        }
        write_file(dir, "cities.csv", &contents)
    }

    #[test]
    fn import_csv_creates_table_and_column_metadata() {
        let dir = tempdir().unwrap();
        let mut engine = SqliteEngine::open_in_memory().unwrap();
        engine.import_csv("cities", &cities_csv(dir.path())).unwrap();

        let count = engine.execute("SELECT COUNT(*) FROM cities").unwrap();
        assert_eq!(count.first_value(), Some(&Value::Integer(30)));

        let columns = engine
            .sql("SELECT colno, name FROM bayesdb_column WHERE tabname = 'cities' ORDER BY colno")
            .unwrap();
        assert_eq!(columns.row_count(), 3);
        assert_eq!(columns.rows()[1][1], Value::from("population"));
    }

    #[test]
    fn import_csv_twice_reports_existing_table() {
        let dir = tempdir().unwrap();
        let path = cities_csv(dir.path());
        let mut engine = SqliteEngine::open_in_memory().unwrap();
        engine.import_csv("cities", &path).unwrap();

        let err = engine.import_csv("cities", &path).unwrap_err();
        assert!(matches!(err, EngineError::TableExists(ref t) if t == "cities"));
    }

    #[test]
    fn import_csv_missing_file_is_io_error() {
        let dir = tempdir().unwrap();
        let mut engine = SqliteEngine::open_in_memory().unwrap();

        let err = engine
            .import_csv("t", &dir.path().join("missing.csv"))
            .unwrap_err();
        assert!(matches!(err, EngineError::Io { .. }));
    }

    #[test]
    fn import_csv_rejects_duplicate_headers() {
        let dir = tempdir().unwrap();
        let path = write_file(dir.path(), "dup.csv", "a,A\n1,2\n");
        let mut engine = SqliteEngine::open_in_memory().unwrap();

        let err = engine.import_csv("dup", &path).unwrap_err();
        assert!(err.to_string().contains("duplicate column name"));
        assert!(!table_exists(&engine.conn, &mut SqlTrace::default(), "dup").unwrap());
    }

    #[test]
    fn empty_cells_import_as_null() {
        let dir = tempdir().unwrap();
        let path = write_file(dir.path(), "gaps.csv", "a,b\n1,\n,x\n");
        let mut engine = SqliteEngine::open_in_memory().unwrap();
        engine.import_csv("gaps", &path).unwrap();

        let result = engine.execute("SELECT a, b FROM gaps ORDER BY rowid").unwrap();
        assert_eq!(result.rows()[0], vec![Value::Integer(1), Value::Null]);
        assert_eq!(result.rows()[1], vec![Value::Null, Value::from("x")]);
    }

    #[test]
    fn describe_columns_without_generator_fails() {
        let dir = tempdir().unwrap();
        let mut engine = SqliteEngine::open_in_memory().unwrap();
        engine.import_csv("cities", &cities_csv(dir.path())).unwrap();

        let err = engine.describe(DescribeKind::Columns, &["cities"]).unwrap_err();
        assert_eq!(err.to_string(), "No such generator: cities");
    }

    #[test]
    fn guess_assigns_stattypes_and_skips_keys() {
        let dir = tempdir().unwrap();
        let mut engine = SqliteEngine::open_in_memory().unwrap();
        engine.import_csv("cities", &cities_csv(dir.path())).unwrap();
        engine.guess_generator("cities_cc", "cities").unwrap();

        let columns = engine.describe(DescribeKind::Columns, &["cities_cc"]).unwrap();
        assert_eq!(columns.columns(), &["colno", "name", "stattype", "shortname"]);
        assert_eq!(columns.row_count(), 2);
        assert_eq!(columns.rows()[0][1], Value::from("population"));
        assert_eq!(columns.rows()[0][2], Value::from("numerical"));
        assert_eq!(columns.rows()[1][2], Value::from("categorical"));
        assert_eq!(columns.rows()[1][3], Value::Null);
    }

    #[test]
    fn guess_rejects_existing_generator() {
        let dir = tempdir().unwrap();
        let mut engine = SqliteEngine::open_in_memory().unwrap();
        engine.import_csv("cities", &cities_csv(dir.path())).unwrap();
        engine.guess_generator("g", "cities").unwrap();

        let err = engine.guess_generator("g", "cities").unwrap_err();
        assert!(matches!(err, EngineError::GeneratorExists(_)));
    }

    #[test]
    fn guess_on_missing_table_fails() {
        let mut engine = SqliteEngine::open_in_memory().unwrap();
        let err = engine.guess_generator("g", "nowhere").unwrap_err();
        assert!(matches!(err, EngineError::NoSuchTable(ref t) if t == "nowhere"));
    }

    #[test]
    fn guess_registers_columns_of_sql_created_tables() {
        let mut engine = SqliteEngine::open_in_memory().unwrap();
        engine.sql("CREATE TABLE t (label TEXT, score REAL)").unwrap();
        engine.sql("INSERT INTO t VALUES ('a', 1.0), ('a', 2.0)").unwrap();
        engine.guess_generator("t_cc", "t").unwrap();

        let columns = engine.describe(DescribeKind::Columns, &["t_cc"]).unwrap();
        assert_eq!(columns.row_count(), 2);
    }

    #[test]
    fn describe_models_of_fresh_generator_is_empty() {
        let dir = tempdir().unwrap();
        let mut engine = SqliteEngine::open_in_memory().unwrap();
        engine.import_csv("cities", &cities_csv(dir.path())).unwrap();
        engine.guess_generator("g", "cities").unwrap();

        let models = engine.describe(DescribeKind::Models, &["g"]).unwrap();
        assert_eq!(models.columns(), &["modelno", "iterations"]);
        assert_eq!(models.row_count(), 0);
    }

    #[test]
    fn describe_tables_filters_and_reports_missing() {
        let dir = tempdir().unwrap();
        let mut engine = SqliteEngine::open_in_memory().unwrap();
        engine.import_csv("cities", &cities_csv(dir.path())).unwrap();

        let all = engine.describe(DescribeKind::Tables, &[]).unwrap();
        assert_eq!(all.rows(), &[vec![Value::from("cities"), Value::Integer(3)]]);

        let err = engine.describe(DescribeKind::Tables, &["ghost"]).unwrap_err();
        assert!(matches!(err, EngineError::NoSuchTable(_)));
    }

    #[test]
    fn codebook_updates_shortnames_and_value_maps() {
        let dir = tempdir().unwrap();
        let mut engine = SqliteEngine::open_in_memory().unwrap();
        engine.import_csv("cities", &cities_csv(dir.path())).unwrap();
        let codebook = write_file(
            dir.path(),
            "codebook.csv",
            "name,shortname,description,value_map\n\
             population,Pop,Number of residents,\n\
             region,Region,Census region,\"{\"\"0\"\": \"\"north\"\", \"\"1\"\": \"\"south\"\"}\"\n",
        );
        engine.load_codebook("cities", &codebook).unwrap();

        let shortnames = engine
            .sql("SELECT shortname FROM bayesdb_column WHERE tabname = 'cities' ORDER BY colno")
            .unwrap();
        assert_eq!(shortnames.rows()[1][0], Value::from("Pop"));

        let map = engine
            .sql("SELECT key, value FROM bayesdb_column_map ORDER BY key")
            .unwrap();
        assert_eq!(map.rows()[1], vec![Value::from("1"), Value::from("south")]);
    }

    #[test]
    fn codebook_with_unknown_column_fails() {
        let dir = tempdir().unwrap();
        let mut engine = SqliteEngine::open_in_memory().unwrap();
        engine.import_csv("cities", &cities_csv(dir.path())).unwrap();
        let codebook = write_file(dir.path(), "cb.csv", "name,shortname,description,value_map\nghost,G,,\n");

        let err = engine.load_codebook("cities", &codebook).unwrap_err();
        assert!(matches!(err, EngineError::NoSuchColumn { .. }));
    }

    #[test]
    fn evaluate_returns_scalar() {
        let mut engine = SqliteEngine::open_in_memory().unwrap();
        assert_eq!(engine.evaluate("2 * 3").unwrap(), Value::Integer(6));
    }

    #[test]
    fn execute_runs_every_statement_and_returns_last() {
        let mut engine = SqliteEngine::open_in_memory().unwrap();
        let result = engine
            .execute("CREATE TABLE t (x); INSERT INTO t VALUES (4); SELECT x FROM t;")
            .unwrap();
        assert_eq!(result.columns(), &["x"]);
        assert_eq!(result.rows(), &[vec![Value::Integer(4)]]);

        let last = engine.execute("SELECT 1; SELECT 2;").unwrap();
        assert_eq!(last.first_value(), Some(&Value::Integer(2)));
    }

    #[test]
    fn empty_statement_is_empty_result() {
        let mut engine = SqliteEngine::open_in_memory().unwrap();
        assert!(!engine.execute(";").unwrap().has_columns());
        assert!(!engine.execute("  ;  ; ").unwrap().has_columns());
    }

    #[test]
    fn error_in_later_statement_is_reported() {
        let mut engine = SqliteEngine::open_in_memory().unwrap();
        assert!(engine.execute("SELECT 1; SELECT * FROM missing;").is_err());
    }

    #[test]
    fn sql_trace_records_only_while_enabled() {
        let mut engine = SqliteEngine::open_in_memory().unwrap();
        engine.execute("SELECT 1").unwrap();
        assert!(engine.drain_sql_trace().is_empty());

        engine.set_sql_trace(true);
        engine.execute("SELECT   1").unwrap();
        assert_eq!(engine.drain_sql_trace(), vec!["SELECT 1".to_string()]);
        assert!(engine.drain_sql_trace().is_empty());

        engine.set_sql_trace(false);
        engine.execute("SELECT 2").unwrap();
        assert!(engine.drain_sql_trace().is_empty());
    }

    #[test]
    fn legacy_models_are_unsupported() {
        let mut engine = SqliteEngine::open_in_memory().unwrap();
        let err = engine
            .load_legacy_models("g", "t", Path::new("models.pkl.gz"))
            .unwrap_err();
        assert!(err.to_string().contains("not supported"));
    }

    #[test]
    fn stattype_guess_thresholds() {
        let few: Vec<Value> = (0..5).map(|i| Value::Integer(i % 2)).collect();
        let many: Vec<Value> = (0..50).map(Value::Integer).collect();
        let keys: Vec<Value> = (0..5).map(|i| Value::Text(format!("k{}", i))).collect();

        assert_eq!(guess_stattype(&few.iter().collect::<Vec<_>>()), Some(StatType::Categorical));
        assert_eq!(guess_stattype(&many.iter().collect::<Vec<_>>()), Some(StatType::Numerical));
        assert_eq!(guess_stattype(&keys.iter().collect::<Vec<_>>()), None);
        assert_eq!(guess_stattype(&[&Value::Null]), None);
    }
}
