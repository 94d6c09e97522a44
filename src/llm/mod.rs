//! Language model gateway.
//!
//! Every chat backend implements [`LlmClient`], whose single operation turns a
//! system and user prompt into raw text. The pipeline depends only on the trait.

pub mod factory;
pub mod groq;
pub mod mock;
pub mod ollama;
pub mod parser;
pub mod prompt;
pub mod types;

pub use factory::create_client;
pub use groq::{GroqClient, GroqConfig};
pub use mock::MockLlmClient;
pub use ollama::{OllamaClient, OllamaConfig};
pub use parser::extract_sql;
pub use prompt::{build_prompts, Prompts, SYSTEM_PROMPT};
pub use types::{Message, Role};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::Result;

/// Trait for chat backends that can generate text.
///
/// Implementations must be thread-safe (Send + Sync) to support async operations.
/// Failures are reported once; implementations do not retry.
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Sends one system + user exchange and returns the model's raw reply.
    async fn generate(&self, system: &str, user: &str) -> Result<String>;
}

/// LLM provider type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LlmProvider {
    /// Local Ollama instance
    #[default]
    Ollama,
    /// Groq cloud (OpenAI-compatible chat completions)
    Groq,
    /// Canned responses for tests and offline demos (no network)
    Mock,
}

impl LlmProvider {
    /// Returns the provider as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ollama => "ollama",
            Self::Groq => "groq",
            Self::Mock => "mock",
        }
    }

    /// Returns the model used when none is configured.
    pub fn default_model(&self) -> &'static str {
        match self {
            Self::Ollama => "llama3.1",
            Self::Groq => "llama-3.1-8b-instant",
            Self::Mock => "mock",
        }
    }
}

impl FromStr for LlmProvider {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "ollama" => Ok(Self::Ollama),
            "groq" => Ok(Self::Groq),
            "mock" => Ok(Self::Mock),
            _ => Err(format!(
                "Unknown LLM provider: {s}. Expected: ollama, groq, or mock"
            )),
        }
    }
}

impl std::fmt::Display for LlmProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_from_str() {
        assert_eq!("ollama".parse::<LlmProvider>().unwrap(), LlmProvider::Ollama);
        assert_eq!("Groq".parse::<LlmProvider>().unwrap(), LlmProvider::Groq);
        assert_eq!(" MOCK ".parse::<LlmProvider>().unwrap(), LlmProvider::Mock);
        assert!("openai".parse::<LlmProvider>().is_err());
    }

    #[test]
    fn test_provider_as_str() {
        assert_eq!(LlmProvider::Ollama.as_str(), "ollama");
        assert_eq!(LlmProvider::Groq.as_str(), "groq");
        assert_eq!(LlmProvider::Mock.as_str(), "mock");
    }

    #[test]
    fn test_provider_display() {
        assert_eq!(format!("{}", LlmProvider::Groq), "groq");
    }

    #[test]
    fn test_provider_default() {
        assert_eq!(LlmProvider::default(), LlmProvider::Ollama);
    }

    #[test]
    fn test_provider_default_models() {
        assert_eq!(LlmProvider::Ollama.default_model(), "llama3.1");
        assert_eq!(LlmProvider::Groq.default_model(), "llama-3.1-8b-instant");
    }

    #[test]
    fn test_provider_serde_lowercase() {
        let json = serde_json::to_string(&LlmProvider::Groq).unwrap();
        assert_eq!(json, "\"groq\"");
        let parsed: LlmProvider = serde_json::from_str("\"ollama\"").unwrap();
        assert_eq!(parsed, LlmProvider::Ollama);
    }

    #[tokio::test]
    async fn test_mock_client_implements_trait() {
        let client: Box<dyn LlmClient> = Box::new(MockLlmClient::new());
        let response = client
            .generate(SYSTEM_PROMPT, "Question: how many orders are there?")
            .await
            .unwrap();
        assert!(response.contains("SELECT"));
    }
}
