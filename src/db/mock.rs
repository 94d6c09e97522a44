//! Mock database client for testing.
//!
//! Serves a fixed schema and a canned result, and records every statement it
//! is asked to run.

use super::{DatabaseClient, QueryResult, Schema};
use crate::error::{Nl2SqlError, Result};
use crate::safety::BoundedSql;
use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// A mock database client that returns predefined results.
#[derive(Debug, Clone, Default)]
pub struct MockDatabaseClient {
    schema: Schema,
    result: QueryResult,
    failure: Option<String>,
    executed: Arc<Mutex<Vec<String>>>,
}

impl MockDatabaseClient {
    /// Creates a new mock database client with an empty schema.
    pub fn new() -> Self {
        Self::default()
    }

    /// Uses the given schema for introspection.
    pub fn with_schema(mut self, schema: Schema) -> Self {
        self.schema = schema;
        self
    }

    /// Returns `result` from every successful `execute` call.
    pub fn with_result(mut self, result: QueryResult) -> Self {
        self.result = result;
        self
    }

    /// Makes every `execute` call fail with a query error carrying `message`.
    pub fn failing(mut self, message: impl Into<String>) -> Self {
        self.failure = Some(message.into());
        self
    }

    /// Returns the statements executed so far, in order.
    pub fn executed(&self) -> Vec<String> {
        self.executed
            .lock()
            .map(|executed| executed.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl DatabaseClient for MockDatabaseClient {
    async fn introspect_schema(&self) -> Result<Schema> {
        Ok(self.schema.clone())
    }

    async fn execute(&self, sql: &BoundedSql) -> Result<QueryResult> {
        if let Ok(mut executed) = self.executed.lock() {
            executed.push(sql.as_str().to_string());
        }

        if let Some(message) = &self.failure {
            return Err(Nl2SqlError::query(message.clone()));
        }

        Ok(self
            .result
            .clone()
            .with_execution_time(Duration::from_millis(1)))
    }
}
