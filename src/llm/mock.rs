//! Mock LLM client for testing.
//!
//! Provides deterministic responses based on the question in the user prompt.

use async_trait::async_trait;
use std::sync::{Arc, Mutex};

use crate::error::{Nl2SqlError, Result};
use crate::llm::LlmClient;

/// Mock LLM client that returns canned responses based on input patterns.
///
/// Used for unit testing and offline demos without making real API calls.
/// Every request is recorded so tests can inspect the prompts that were sent.
#[derive(Debug, Clone, Default)]
pub struct MockLlmClient {
    /// Custom response mappings (pattern -> response).
    custom_responses: Vec<(String, String)>,
    /// When set, every call fails with this gateway error message.
    failure: Option<String>,
    /// (system, user) pairs received so far.
    requests: Arc<Mutex<Vec<(String, String)>>>,
}

impl MockLlmClient {
    /// Creates a new mock client with default responses.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a custom response mapping.
    ///
    /// When the question contains `pattern`, the mock will return `response`.
    pub fn with_response(
        mut self,
        pattern: impl Into<String>,
        response: impl Into<String>,
    ) -> Self {
        self.custom_responses
            .push((pattern.into(), response.into()));
        self
    }

    /// Makes every call fail with an LLM error carrying `message`.
    pub fn failing(mut self, message: impl Into<String>) -> Self {
        self.failure = Some(message.into());
        self
    }

    /// Returns the (system, user) prompt pairs received so far.
    pub fn requests(&self) -> Vec<(String, String)> {
        self.requests
            .lock()
            .map(|requests| requests.clone())
            .unwrap_or_default()
    }

    /// Generates a mock response based on the input.
    fn mock_response(&self, question: &str) -> String {
        let question = question.to_lowercase();

        // Check custom responses first
        for (pattern, response) in &self.custom_responses {
            if question.contains(&pattern.to_lowercase()) {
                return response.clone();
            }
        }

        if question.contains("how many") && question.contains("orders") {
            return "```sql\nSELECT COUNT(*) AS total_orders FROM orders;\n```".to_string();
        }

        if question.contains("per customer") || question.contains("by customer") {
            return "```sql\nSELECT customer, SUM(amount) AS total FROM orders GROUP BY customer ORDER BY total DESC\n```"
                .to_string();
        }

        if question.contains("all orders") || question.contains("show orders") {
            return "SQL: SELECT * FROM orders".to_string();
        }

        if question.contains("delete") || question.contains("remove") {
            return "```sql\nDELETE FROM orders WHERE 1=1;\n```".to_string();
        }

        if question.contains("drop") {
            return "```sql\nDROP TABLE orders\n```".to_string();
        }

        "I don't understand that question. Could you please rephrase it?".to_string()
    }

    /// Extracts the question line from the user prompt, or the whole prompt.
    fn extract_question(user: &str) -> &str {
        user.lines()
            .rev()
            .find_map(|line| line.strip_prefix("Question:"))
            .map(str::trim)
            .unwrap_or(user)
    }
}

#[async_trait]
impl LlmClient for MockLlmClient {
    async fn generate(&self, system: &str, user: &str) -> Result<String> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push((system.to_string(), user.to_string()));
        }

        if let Some(message) = &self.failure {
            return Err(Nl2SqlError::llm(message.clone()));
        }

        Ok(self.mock_response(Self::extract_question(user)))
    }
}
