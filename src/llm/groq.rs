//! Groq LLM client implementation.
//!
//! Groq serves an OpenAI-compatible chat completions API. Requests are sent
//! once; failures surface to the caller without retry.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use crate::error::{Nl2SqlError, Result};
use crate::llm::types::{chat_messages, Message};
use crate::llm::LlmClient;

/// Default timeout for API requests.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Groq chat completions endpoint.
pub const GROQ_API_URL: &str = "https://api.groq.com/openai/v1/chat/completions";

/// Groq client configuration.
#[derive(Debug, Clone)]
pub struct GroqConfig {
    /// API key for authentication.
    pub api_key: String,
    /// Model to use (e.g., "llama-3.1-8b-instant").
    pub model: String,
    /// Sampling temperature.
    pub temperature: f32,
    /// Nucleus sampling cutoff.
    pub top_p: f32,
    /// Endpoint URL. Overridable for proxies.
    pub api_url: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl GroqConfig {
    /// Creates a new config with the given API key and model.
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: model.into(),
            temperature: 0.0,
            top_p: 0.9,
            api_url: GROQ_API_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Sets the sampling parameters.
    pub fn with_sampling(mut self, temperature: f32, top_p: f32) -> Self {
        self.temperature = temperature;
        self.top_p = top_p;
        self
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }
}

/// Groq LLM client.
#[derive(Debug, Clone)]
pub struct GroqClient {
    config: GroqConfig,
    client: Client,
}

impl GroqClient {
    /// Creates a new Groq client with the given configuration.
    ///
    /// Fails with a configuration error when the key or model is missing.
    pub fn new(config: GroqConfig) -> Result<Self> {
        if config.api_key.trim().is_empty() {
            return Err(Nl2SqlError::config(
                "GROQ_API_KEY not set. Configure the environment variable or llm.api_key.",
            ));
        }
        if config.model.trim().is_empty() {
            return Err(Nl2SqlError::config("Groq model name is empty"));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| Nl2SqlError::llm(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    fn build_request(&self, system: &str, user: &str) -> GroqRequest {
        GroqRequest {
            model: self.config.model.clone(),
            messages: chat_messages(system, user),
            temperature: self.config.temperature,
            top_p: self.config.top_p,
            stream: false,
        }
    }

    /// Turns an error response into a gateway error.
    fn parse_error(status: StatusCode, body: &str) -> Nl2SqlError {
        if status == StatusCode::UNAUTHORIZED {
            return Nl2SqlError::llm("Authentication failed. Check your GROQ_API_KEY.");
        }

        if status == StatusCode::TOO_MANY_REQUESTS {
            return Nl2SqlError::llm("Rate limited. Please wait and try again.");
        }

        if let Ok(error_response) = serde_json::from_str::<GroqErrorResponse>(body) {
            return Nl2SqlError::llm(format!("Groq API error: {}", error_response.error.message));
        }

        Nl2SqlError::llm(format!("Groq API error ({}): {}", status, body))
    }
}

#[async_trait]
impl LlmClient for GroqClient {
    async fn generate(&self, system: &str, user: &str) -> Result<String> {
        let request = self.build_request(system, user);
        debug!(model = %self.config.model, "Sending Groq chat request");

        let response = self
            .client
            .post(&self.config.api_url)
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    Nl2SqlError::llm("Request timed out. Try again.")
                } else if e.is_connect() {
                    Nl2SqlError::llm("Failed to connect to Groq API. Check your network.")
                } else {
                    Nl2SqlError::llm(format!("Request failed: {}", e))
                }
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| Nl2SqlError::llm(format!("Failed to read response: {}", e)))?;

        if !status.is_success() {
            return Err(Self::parse_error(status, &body));
        }

        parse_response(&body)
    }
}

fn parse_response(body: &str) -> Result<String> {
    let response: GroqResponse = serde_json::from_str(body)
        .map_err(|e| Nl2SqlError::llm(format!("Failed to parse response: {}", e)))?;

    response
        .choices
        .into_iter()
        .next()
        .map(|c| c.message.content)
        .ok_or_else(|| Nl2SqlError::llm("No response from Groq"))
}

// Groq (OpenAI-compatible) API types

#[derive(Debug, Serialize)]
struct GroqRequest {
    model: String,
    messages: Vec<Message>,
    temperature: f32,
    top_p: f32,
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct GroqResponse {
    choices: Vec<GroqChoice>,
}

#[derive(Debug, Deserialize)]
struct GroqChoice {
    message: GroqMessage,
}

#[derive(Debug, Deserialize)]
struct GroqMessage {
    content: String,
}

#[derive(Debug, Deserialize)]
struct GroqErrorResponse {
    error: GroqError,
}

#[derive(Debug, Deserialize)]
struct GroqError {
    message: String,
}
