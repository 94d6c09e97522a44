//! Configuration management for nl2sql-duck.
//!
//! Settings come from, in increasing precedence: built-in defaults, a TOML
//! file, environment variables (optionally from `.env`), and CLI flags. The
//! result is a plain [`Config`] value handed to the client constructors; the
//! query pipeline never reads global state.

use crate::error::{Nl2SqlError, Result};
use crate::llm::LlmProvider;
use crate::safety::DEFAULT_LIMIT;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Main configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    /// LLM provider configuration.
    #[serde(default)]
    pub llm: LlmConfig,

    /// Embedded database configuration.
    #[serde(default)]
    pub database: DatabaseConfig,
}

/// LLM provider configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LlmConfig {
    /// LLM provider: "ollama", "groq" or "mock".
    #[serde(default)]
    pub provider: LlmProvider,

    /// Model name. Falls back to the provider's default when unset.
    #[serde(default)]
    pub model: Option<String>,

    /// Base URL of the Ollama server.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// API key (Groq). Prefer the environment over storing it in the file.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Sampling temperature.
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Nucleus sampling cutoff.
    #[serde(default = "default_top_p")]
    pub top_p: f32,

    /// HTTP request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    crate::llm::ollama::DEFAULT_OLLAMA_URL.to_string()
}

fn default_temperature() -> f32 {
    0.0
}

fn default_top_p() -> f32 {
    0.9
}

fn default_timeout_secs() -> u64 {
    60
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: LlmProvider::default(),
            model: None,
            base_url: default_base_url(),
            api_key: None,
            temperature: default_temperature(),
            top_p: default_top_p(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl LlmConfig {
    /// Returns the configured model, or the provider default.
    pub fn resolved_model(&self) -> String {
        self.model
            .as_deref()
            .map(str::trim)
            .filter(|model| !model.is_empty())
            .unwrap_or_else(|| self.provider.default_model())
            .to_string()
    }
}

/// Embedded database configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DatabaseConfig {
    /// Path of the DuckDB file.
    #[serde(default = "default_db_path")]
    pub path: PathBuf,

    /// Row bound appended to queries without a LIMIT.
    #[serde(default = "default_limit")]
    pub default_limit: u32,
}

fn default_db_path() -> PathBuf {
    PathBuf::from("./db/nl2sql.duckdb")
}

fn default_limit() -> u32 {
    DEFAULT_LIMIT
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
            default_limit: default_limit(),
        }
    }
}

impl Config {
    /// Returns the default config file path for the current platform.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("nl2sql-duck")
            .join("config.toml")
    }

    /// Loads configuration from a TOML file. A missing file yields defaults.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| Nl2SqlError::config(format!("Failed to read config file: {e}")))?;

        Self::parse_toml(&content, path)
    }

    /// Parses configuration from a TOML string.
    fn parse_toml(content: &str, path: &Path) -> Result<Self> {
        toml::from_str(content).map_err(|e| {
            Nl2SqlError::config(format!(
                "Configuration error in {}:\n  {}",
                path.display(),
                e
            ))
        })
    }

    /// Applies overrides using `lookup` to read variables.
    ///
    /// Recognized: `LLM_PROVIDER`, `OLLAMA_BASE_URL`, `OLLAMA_MODEL`,
    /// `GROQ_MODEL`, `GROQ_API_KEY`, `LLM_TEMPERATURE` (or `OLLAMA_TEMPERATURE`),
    /// `LLM_TOP_P` (or `OLLAMA_TOP_P`), `DUCKDB_PATH`, `NL2SQL_DEFAULT_LIMIT`.
    /// The model variable read depends on the provider in effect after
    /// `LLM_PROVIDER` is applied.
    pub fn apply_env_overrides_from<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        if let Some(provider) = lookup("LLM_PROVIDER") {
            self.llm.provider = provider
                .parse()
                .map_err(|e: String| Nl2SqlError::config(format!("LLM_PROVIDER: {e}")))?;
        }

        if let Some(base_url) = lookup("OLLAMA_BASE_URL") {
            self.llm.base_url = base_url;
        }

        let model_var = match self.llm.provider {
            LlmProvider::Ollama => Some("OLLAMA_MODEL"),
            LlmProvider::Groq => Some("GROQ_MODEL"),
            LlmProvider::Mock => None,
        };
        if let Some(model) = model_var.and_then(|var| lookup(var)) {
            self.llm.model = Some(model);
        }

        if let Some(key) = lookup("GROQ_API_KEY") {
            self.llm.api_key = Some(key);
        }

        if let Some((var, value)) =
            first_set(&lookup, &["LLM_TEMPERATURE", "OLLAMA_TEMPERATURE"])
        {
            self.llm.temperature = parse_env(var, &value)?;
        }

        if let Some((var, value)) = first_set(&lookup, &["LLM_TOP_P", "OLLAMA_TOP_P"]) {
            self.llm.top_p = parse_env(var, &value)?;
        }

        if let Some(path) = lookup("DUCKDB_PATH") {
            self.database.path = PathBuf::from(path);
        }

        if let Some(limit) = lookup("NL2SQL_DEFAULT_LIMIT") {
            self.database.default_limit = parse_env("NL2SQL_DEFAULT_LIMIT", &limit)?;
        }

        Ok(())
    }

    /// Checks value ranges that serde cannot express.
    pub fn validate(&self) -> Result<()> {
        if self.database.default_limit == 0 {
            return Err(Nl2SqlError::config("default_limit must be at least 1"));
        }
        if !(0.0..=2.0).contains(&self.llm.temperature) {
            return Err(Nl2SqlError::config(format!(
                "temperature must be between 0 and 2, got {}",
                self.llm.temperature
            )));
        }
        if !(0.0..=1.0).contains(&self.llm.top_p) {
            return Err(Nl2SqlError::config(format!(
                "top_p must be between 0 and 1, got {}",
                self.llm.top_p
            )));
        }
        Ok(())
    }
}

fn first_set<F>(lookup: &F, vars: &[&'static str]) -> Option<(&'static str, String)>
where
    F: Fn(&str) -> Option<String>,
{
    vars.iter()
        .find_map(|var| lookup(var).map(|value| (*var, value)))
}

fn parse_env<T: FromStr>(var: &str, value: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| Nl2SqlError::config(format!("Invalid value for {var}: '{value}'")))
}
