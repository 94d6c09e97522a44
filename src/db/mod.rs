//! Database abstraction layer.
//!
//! Provides a trait-based interface for the two things the pipeline needs from
//! a database: its schema and the rows of a bounded query. The DuckDB client is
//! the real backend; the mock client backs tests and offline runs.

mod duck;
mod mock;
mod schema;
mod types;

pub use duck::{validate_identifier, DuckDbClient};
pub use mock::MockDatabaseClient;
pub use schema::{Column, Schema, Table};
pub use types::{ColumnInfo, QueryResult, Row, Value};

use crate::error::Result;
use crate::safety::BoundedSql;
use async_trait::async_trait;

/// Trait defining the interface for database clients.
///
/// `execute` only accepts [`BoundedSql`], so a statement that has not been
/// through the safety gate and limit enforcement cannot reach the engine.
#[async_trait]
pub trait DatabaseClient: Send + Sync {
    /// Reads table and column metadata for the `main` schema.
    async fn introspect_schema(&self) -> Result<Schema>;

    /// Executes a bounded query and returns the column names and rows.
    async fn execute(&self, sql: &BoundedSql) -> Result<QueryResult>;

    /// Returns the schema rendered as prompt text (empty when there are no tables).
    async fn describe_schema(&self) -> Result<String> {
        Ok(self.introspect_schema().await?.format_for_llm())
    }

    /// Returns `(table, comma-joined column names)` pairs.
    async fn list_tables(&self) -> Result<Vec<(String, String)>> {
        Ok(self.introspect_schema().await?.table_listing())
    }
}
