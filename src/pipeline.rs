//! Natural language to SQL pipeline.
//!
//! `Nl2Sql` is the single entry point for turning a question into rows:
//!
//! describe schema → build prompts → generate → extract → bound → gate → execute
//!
//! The direct-SQL path enters at "bound" and goes through the same gate. Every
//! step reports exactly one error to the caller; nothing is retried and no
//! fallback model or query is tried.

use std::time::Instant;

use crate::db::{DatabaseClient, QueryResult};
use crate::error::Result;
use crate::llm::{build_prompts, extract_sql, LlmClient};
use crate::safety::BoundedSql;

/// The statement that ran and what it returned.
#[derive(Debug, Clone)]
pub struct Answer {
    /// The bounded statement handed to the database.
    pub sql: BoundedSql,
    /// Rows returned by the database.
    pub result: QueryResult,
}

/// Question-to-rows pipeline over an injected model client.
pub struct Nl2Sql {
    client: Box<dyn LlmClient>,
    default_limit: u32,
}

impl Nl2Sql {
    /// Creates a pipeline that bounds every statement to `default_limit` rows
    /// unless it already carries a `LIMIT`.
    pub fn new(client: Box<dyn LlmClient>, default_limit: u32) -> Self {
        Self {
            client,
            default_limit,
        }
    }

    /// Returns the row bound applied to statements without a `LIMIT`.
    pub fn default_limit(&self) -> u32 {
        self.default_limit
    }

    /// Asks the model for a query answering `question` over `schema_text`
    /// and returns it bounded and validated.
    pub async fn synthesize(&self, question: &str, schema_text: &str) -> Result<BoundedSql> {
        let prompts = build_prompts(question, schema_text);
        tracing::debug!(
            question_len = question.len(),
            schema_len = schema_text.len(),
            "Sending request to LLM"
        );

        let llm_start = Instant::now();
        let raw = self.client.generate(&prompts.system, &prompts.user).await?;
        tracing::debug!(
            llm_duration_ms = llm_start.elapsed().as_millis() as u64,
            response_len = raw.len(),
            "Received LLM response"
        );

        let candidate = extract_sql(&raw);
        tracing::debug!(sql = %candidate, "Extracted candidate SQL");

        BoundedSql::new(&candidate, self.default_limit)
    }

    /// Bounds and validates user-supplied SQL without involving the model.
    pub fn prepare_direct(&self, sql: &str) -> Result<BoundedSql> {
        BoundedSql::new(sql, self.default_limit)
    }

    /// Answers `question` against `db`: describe, synthesize, execute.
    pub async fn answer(&self, question: &str, db: &dyn DatabaseClient) -> Result<Answer> {
        let schema_text = db.describe_schema().await?;
        let sql = self.synthesize(question, &schema_text).await?;
        execute(sql, db).await
    }

    /// Runs user-supplied SQL against `db` through the same gate.
    pub async fn run_direct(&self, sql: &str, db: &dyn DatabaseClient) -> Result<Answer> {
        run_direct(sql, self.default_limit, db).await
    }
}

/// Bounds, validates and runs user-supplied SQL. No model client is needed.
pub async fn run_direct(sql: &str, default_limit: u32, db: &dyn DatabaseClient) -> Result<Answer> {
    let sql = BoundedSql::new(sql, default_limit)?;
    execute(sql, db).await
}

async fn execute(sql: BoundedSql, db: &dyn DatabaseClient) -> Result<Answer> {
    let start = Instant::now();
    let result = db.execute(&sql).await?;
    tracing::info!(
        rows = result.row_count,
        elapsed_ms = start.elapsed().as_millis() as u64,
        "Query completed"
    );
    Ok(Answer { sql, result })
}
