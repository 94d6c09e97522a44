//! DuckDB database client implementation.
//!
//! Provides the `DuckDbClient` struct that implements the `DatabaseClient` trait
//! for a DuckDB database file. DuckDB connections are synchronous, so every
//! operation opens its own connection on the blocking thread pool and closes
//! it before returning. No connection state is shared between calls.

use std::path::{Path, PathBuf};
use std::time::Instant;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveTime};
use duckdb::types::{TimeUnit, Value as DuckValue};
use duckdb::Connection;
use tracing::{debug, info};

use crate::db::{ColumnInfo, DatabaseClient, QueryResult, Row, Schema, Value};
use crate::error::{Nl2SqlError, Result};
use crate::safety::BoundedSql;

/// Days between 0001-01-01 (day 1 of the common era) and 1970-01-01.
const UNIX_EPOCH_DAYS_FROM_CE: i32 = 719_163;

const SCHEMA_QUERY: &str = "SELECT table_name, column_name, data_type \
     FROM information_schema.columns \
     WHERE table_schema = 'main' \
     ORDER BY table_name, ordinal_position";

/// DuckDB database client bound to a single database file.
#[derive(Debug, Clone)]
pub struct DuckDbClient {
    path: PathBuf,
}

impl DuckDbClient {
    /// Opens (or creates) the database file at `path`.
    ///
    /// Missing parent directories are created. The file is opened once to
    /// make sure it is a usable DuckDB database, then closed again.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| {
                Nl2SqlError::connection(format!(
                    "Cannot create directory {}: {e}",
                    parent.display()
                ))
            })?;
        }

        connect(&path)?;
        debug!(path = %path.display(), "Opened DuckDB database");

        Ok(Self { path })
    }

    /// Returns the database file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Creates (or replaces) `table` from the CSV file at `csv_path` and
    /// returns the number of rows loaded.
    ///
    /// The table name must be a plain identifier and the path must not contain
    /// a single quote, since both are spliced into the statement text.
    pub async fn load_csv(&self, csv_path: &Path, table: &str) -> Result<u64> {
        validate_identifier(table)?;

        let csv = csv_path.to_string_lossy().into_owned();
        if csv.contains('\'') {
            return Err(Nl2SqlError::config(format!(
                "CSV path must not contain a single quote: {csv}"
            )));
        }
        if !csv_path.is_file() {
            return Err(Nl2SqlError::config(format!("CSV file not found: {csv}")));
        }

        let table = table.to_string();
        let count = self
            .run_blocking(move |conn| {
                conn.execute_batch(&format!(
                    "CREATE OR REPLACE TABLE {table} AS \
                     SELECT * FROM read_csv_auto('{csv}', header=true)"
                ))?;
                let count: i64 =
                    conn.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| {
                        row.get(0)
                    })?;
                Ok(count.max(0) as u64)
            })
            .await?;

        info!(rows = count, "Loaded CSV into DuckDB");
        Ok(count)
    }

    /// Runs `f` against a fresh connection on the blocking thread pool.
    ///
    /// Waits for `f` to finish. There is no time bound on a statement.
    async fn run_blocking<T, F>(&self, f: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&Connection) -> Result<T> + Send + 'static,
    {
        let path = self.path.clone();
        let task = tokio::task::spawn_blocking(move || {
            let conn = connect(&path)?;
            f(&conn)
        });

        task.await
            .map_err(|e| Nl2SqlError::internal(format!("Database task failed: {e}")))?
    }
}

#[async_trait]
impl DatabaseClient for DuckDbClient {
    async fn introspect_schema(&self) -> Result<Schema> {
        let rows = self
            .run_blocking(|conn| {
                let mut stmt = conn.prepare(SCHEMA_QUERY)?;
                let rows = stmt
                    .query_map([], |row| {
                        Ok((
                            row.get::<_, String>(0)?,
                            row.get::<_, String>(1)?,
                            row.get::<_, String>(2)?,
                        ))
                    })?
                    .collect::<std::result::Result<Vec<_>, _>>()?;
                Ok(rows)
            })
            .await?;

        let schema = Schema::from_column_rows(rows);
        debug!(tables = schema.tables.len(), "Introspected schema");
        Ok(schema)
    }

    async fn execute(&self, sql: &BoundedSql) -> Result<QueryResult> {
        let start = Instant::now();
        let text = sql.as_str().to_string();

        let (names, rows) = self
            .run_blocking(move |conn| {
                let mut stmt = conn.prepare(&text)?;
                let mut result = stmt.query([])?;

                let names: Vec<String> = result
                    .as_ref()
                    .map(|stmt| stmt.column_names())
                    .unwrap_or_default();

                let mut rows: Vec<Row> = Vec::new();
                while let Some(row) = result.next()? {
                    let mut values = Vec::with_capacity(names.len());
                    for idx in 0..names.len() {
                        values.push(convert_value(row.get::<_, DuckValue>(idx)?));
                    }
                    rows.push(values);
                }
                Ok((names, rows))
            })
            .await?;

        let execution_time = start.elapsed();
        debug!(
            rows = rows.len(),
            elapsed_ms = execution_time.as_millis() as u64,
            "Query executed"
        );

        let columns = infer_columns(names, &rows);
        Ok(QueryResult::with_data(columns, rows).with_execution_time(execution_time))
    }
}

fn connect(path: &Path) -> Result<Connection> {
    Connection::open(path).map_err(|e| {
        Nl2SqlError::connection(format!("Cannot open database {}: {e}", path.display()))
    })
}

/// Checks that `name` matches `[A-Za-z_][A-Za-z0-9_]*`.
pub fn validate_identifier(name: &str) -> Result<()> {
    let mut chars = name.chars();
    let valid = match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    };

    if valid {
        Ok(())
    } else {
        Err(Nl2SqlError::config(format!(
            "Invalid table name '{name}': use letters, digits and underscores"
        )))
    }
}

/// Labels each column with the type of its first non-null value.
fn infer_columns(names: Vec<String>, rows: &[Row]) -> Vec<ColumnInfo> {
    names
        .into_iter()
        .enumerate()
        .map(|(idx, name)| {
            let data_type = rows
                .iter()
                .filter_map(|row| row.get(idx))
                .find(|value| !value.is_null())
                .map(Value::type_name)
                .unwrap_or("null");
            ColumnInfo::new(name, data_type)
        })
        .collect()
}

/// Converts a DuckDB value into the crate's value type.
///
/// Integers that do not fit in `i64`, decimals, temporal values and nested
/// values are rendered as text.
fn convert_value(value: DuckValue) -> Value {
    match value {
        DuckValue::Null => Value::Null,
        DuckValue::Boolean(b) => Value::Bool(b),
        DuckValue::TinyInt(i) => Value::Int(i.into()),
        DuckValue::SmallInt(i) => Value::Int(i.into()),
        DuckValue::Int(i) => Value::Int(i.into()),
        DuckValue::BigInt(i) => Value::Int(i),
        DuckValue::UTinyInt(i) => Value::Int(i.into()),
        DuckValue::USmallInt(i) => Value::Int(i.into()),
        DuckValue::UInt(i) => Value::Int(i.into()),
        DuckValue::UBigInt(i) => i64::try_from(i)
            .map(Value::Int)
            .unwrap_or_else(|_| Value::String(i.to_string())),
        DuckValue::HugeInt(i) => i64::try_from(i)
            .map(Value::Int)
            .unwrap_or_else(|_| Value::String(i.to_string())),
        DuckValue::Float(f) => Value::Float(f.into()),
        DuckValue::Double(f) => Value::Float(f),
        DuckValue::Decimal(d) => Value::String(d.to_string()),
        DuckValue::Text(s) => Value::String(s),
        DuckValue::Enum(s) => Value::String(s),
        DuckValue::Blob(b) => Value::Bytes(b),
        DuckValue::Date32(days) => Value::String(format_date(days)),
        DuckValue::Timestamp(unit, v) => Value::String(format_timestamp(to_micros(unit, v))),
        DuckValue::Time64(unit, v) => Value::String(format_time(to_micros(unit, v))),
        other => Value::String(format!("{other:?}")),
    }
}

fn to_micros(unit: TimeUnit, value: i64) -> i64 {
    match unit {
        TimeUnit::Second => value.saturating_mul(1_000_000),
        TimeUnit::Millisecond => value.saturating_mul(1_000),
        TimeUnit::Microsecond => value,
        TimeUnit::Nanosecond => value / 1_000,
    }
}

fn format_date(days_since_epoch: i32) -> String {
    days_since_epoch
        .checked_add(UNIX_EPOCH_DAYS_FROM_CE)
        .and_then(NaiveDate::from_num_days_from_ce_opt)
        .map(|date| date.to_string())
        .unwrap_or_else(|| format!("date({days_since_epoch})"))
}

fn format_timestamp(micros: i64) -> String {
    DateTime::from_timestamp_micros(micros)
        .map(|dt| dt.naive_utc().to_string())
        .unwrap_or_else(|| format!("timestamp({micros})"))
}

fn format_time(micros: i64) -> String {
    let secs = micros.div_euclid(1_000_000);
    let nanos = micros.rem_euclid(1_000_000) * 1_000;
    u32::try_from(secs)
        .ok()
        .zip(u32::try_from(nanos).ok())
        .and_then(|(s, n)| NaiveTime::from_num_seconds_from_midnight_opt(s, n))
        .map(|time| time.to_string())
        .unwrap_or_else(|| format!("time({micros})"))
}
