//! LLM client factory.
//!
//! Centralizes provider-specific logic for creating LLM clients from an
//! explicit [`LlmConfig`]. Nothing here reads the environment; that happens
//! once, in [`crate::cli::Cli::resolve_config`].

use tracing::info;

use crate::config::LlmConfig;
use crate::error::{Nl2SqlError, Result};
use crate::llm::{
    GroqClient, GroqConfig, LlmClient, LlmProvider, MockLlmClient, OllamaClient, OllamaConfig,
};

/// Creates an LLM client for the configured provider.
///
/// Fails with a configuration error when the provider needs a credential
/// (Groq) and none is configured, or when the base URL is invalid.
pub fn create_client(config: &LlmConfig) -> Result<Box<dyn LlmClient>> {
    let model = config.resolved_model();
    info!(provider = %config.provider, model = %model, "Creating LLM client");

    match config.provider {
        LlmProvider::Ollama => {
            let ollama = OllamaConfig::new(model)
                .with_url(config.base_url.clone())
                .with_sampling(config.temperature, config.top_p)
                .with_timeout(config.timeout_secs);
            Ok(Box::new(OllamaClient::new(ollama)?))
        }
        LlmProvider::Groq => {
            let key = config
                .api_key
                .clone()
                .filter(|key| !key.trim().is_empty())
                .ok_or_else(|| {
                    Nl2SqlError::config(
                        "GROQ_API_KEY not set. Configure the environment variable or llm.api_key.",
                    )
                })?;
            let groq = GroqConfig::new(key, model)
                .with_sampling(config.temperature, config.top_p)
                .with_timeout(config.timeout_secs);
            Ok(Box::new(GroqClient::new(groq)?))
        }
        LlmProvider::Mock => Ok(Box::new(MockLlmClient::new())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_mock_client() {
        let config = LlmConfig {
            provider: LlmProvider::Mock,
            ..Default::default()
        };
        assert!(create_client(&config).is_ok());
    }

    #[test]
    fn test_create_ollama_client_with_defaults() {
        let config = LlmConfig::default();
        assert!(create_client(&config).is_ok());
    }

    #[test]
    fn test_create_ollama_with_bad_url_fails() {
        let config = LlmConfig {
            base_url: "::not-a-url::".to_string(),
            ..Default::default()
        };
        let err = create_client(&config).err().unwrap();
        assert!(matches!(err, Nl2SqlError::Config(_)));
    }

    #[test]
    fn test_create_groq_without_key_fails() {
        let config = LlmConfig {
            provider: LlmProvider::Groq,
            api_key: None,
            ..Default::default()
        };
        let err = create_client(&config).err().unwrap();
        assert!(matches!(err, Nl2SqlError::Config(_)));
        assert!(err.to_string().contains("GROQ_API_KEY not set"));
    }

    #[test]
    fn test_create_groq_with_blank_key_fails() {
        let config = LlmConfig {
            provider: LlmProvider::Groq,
            api_key: Some("   ".to_string()),
            ..Default::default()
        };
        assert!(create_client(&config).is_err());
    }

    #[test]
    fn test_create_groq_with_key() {
        let config = LlmConfig {
            provider: LlmProvider::Groq,
            api_key: Some("gsk-test".to_string()),
            ..Default::default()
        };
        assert!(create_client(&config).is_ok());
    }
}
