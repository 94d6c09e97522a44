//! Ollama LLM client implementation.
//!
//! Talks to a local (or self-hosted) Ollama server through its `/api/chat`
//! endpoint with streaming disabled.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;
use url::Url;

use crate::error::{Nl2SqlError, Result};
use crate::llm::types::{chat_messages, Message};
use crate::llm::LlmClient;

/// Default timeout for API requests.
const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Default Ollama API URL.
pub const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434";

/// Ollama client configuration.
#[derive(Debug, Clone)]
pub struct OllamaConfig {
    /// Base URL for the Ollama API.
    pub base_url: String,
    /// Model to use (e.g., "llama3.1", "qwen2.5-coder").
    pub model: String,
    /// Sampling temperature.
    pub temperature: f32,
    /// Nucleus sampling cutoff.
    pub top_p: f32,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl OllamaConfig {
    /// Creates a new config with the given model.
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_OLLAMA_URL.to_string(),
            model: model.into(),
            temperature: 0.0,
            top_p: 0.9,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Sets the base URL.
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
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

impl Default for OllamaConfig {
    fn default() -> Self {
        Self::new("llama3.1")
    }
}

/// Ollama LLM client.
#[derive(Debug, Clone)]
pub struct OllamaClient {
    config: OllamaConfig,
    chat_url: Url,
    client: Client,
}

impl OllamaClient {
    /// Creates a new Ollama client with the given configuration.
    ///
    /// Fails with a configuration error if the model is empty or the base URL
    /// is not an http(s) URL.
    pub fn new(config: OllamaConfig) -> Result<Self> {
        if config.model.trim().is_empty() {
            return Err(Nl2SqlError::config("Ollama model name is empty"));
        }

        let chat_url = chat_url(&config.base_url)?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| Nl2SqlError::llm(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            config,
            chat_url,
            client,
        })
    }

    /// Returns the chat API endpoint URL.
    pub fn chat_url(&self) -> &str {
        self.chat_url.as_str()
    }

    fn build_request(&self, system: &str, user: &str) -> OllamaRequest {
        OllamaRequest {
            model: self.config.model.clone(),
            messages: chat_messages(system, user),
            stream: false,
            options: OllamaOptions {
                temperature: self.config.temperature,
                top_p: self.config.top_p,
            },
        }
    }
}

/// Resolves `{base_url}/api/chat`, keeping any path prefix on the base URL.
fn chat_url(base_url: &str) -> Result<Url> {
    let mut base = Url::parse(base_url.trim())
        .map_err(|e| Nl2SqlError::config(format!("Invalid Ollama base URL '{base_url}': {e}")))?;

    if base.scheme() != "http" && base.scheme() != "https" {
        return Err(Nl2SqlError::config(format!(
            "Invalid scheme '{}' for Ollama base URL. Expected 'http' or 'https'",
            base.scheme()
        )));
    }

    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }

    base.join("api/chat")
        .map_err(|e| Nl2SqlError::config(format!("Invalid Ollama base URL '{base_url}': {e}")))
}

#[async_trait]
impl LlmClient for OllamaClient {
    async fn generate(&self, system: &str, user: &str) -> Result<String> {
        let request = self.build_request(system, user);
        debug!(model = %self.config.model, url = %self.chat_url, "Sending Ollama chat request");

        let response = self
            .client
            .post(self.chat_url.clone())
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    Nl2SqlError::llm("Request timed out. Try again.")
                } else if e.is_connect() {
                    Nl2SqlError::llm(
                        "Failed to connect to Ollama. Is it running? Try: ollama serve",
                    )
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
            return Err(Nl2SqlError::llm(format!(
                "Ollama API error ({}): {}",
                status, body
            )));
        }

        parse_response(&body)
    }
}

fn parse_response(body: &str) -> Result<String> {
    let response: OllamaResponse = serde_json::from_str(body)
        .map_err(|e| Nl2SqlError::llm(format!("Failed to parse response: {}", e)))?;

    Ok(response.message.content)
}

// Ollama API types

#[derive(Debug, Serialize)]
struct OllamaRequest {
    model: String,
    messages: Vec<Message>,
    stream: bool,
    options: OllamaOptions,
}

#[derive(Debug, Serialize)]
struct OllamaOptions {
    temperature: f32,
    top_p: f32,
}

#[derive(Debug, Deserialize)]
struct OllamaResponse {
    message: OllamaMessage,
}

#[derive(Debug, Deserialize)]
struct OllamaMessage {
    content: String,
}
