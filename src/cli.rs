//! Command-line argument parsing for nl2sql.
//!
//! Uses clap derive. Global options select the config file and database;
//! subcommands load sample data, list the schema, or answer a question.

use crate::config::Config;
use crate::error::Result;
use crate::llm::LlmProvider;
use crate::output::OutputFormat;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Ask questions about a DuckDB database in plain language.
#[derive(Parser, Debug)]
#[command(name = "nl2sql")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Config file path
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// DuckDB database file (overrides config and DUCKDB_PATH)
    #[arg(long, value_name = "PATH", global = true)]
    pub db: Option<PathBuf>,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Load a CSV file into a DuckDB table
    Setup(SetupArgs),

    /// List tables and their columns
    Schema,

    /// Answer a question (or run SQL directly with --sql)
    Ask(AskArgs),
}

/// Arguments for `setup`.
#[derive(Args, Debug)]
pub struct SetupArgs {
    /// CSV file with a header row
    #[arg(long, value_name = "PATH", default_value = "./data/orders.csv")]
    pub csv: PathBuf,

    /// Table to create or replace
    #[arg(long, value_name = "NAME", default_value = "orders")]
    pub table: String,
}

/// Arguments for `ask`.
#[derive(Args, Debug)]
pub struct AskArgs {
    /// Question in natural language
    #[arg(value_name = "QUESTION")]
    pub question: Option<String>,

    /// Run this SQL instead of asking the model (still checked and limited)
    #[arg(long, value_name = "SQL")]
    pub sql: Option<String>,

    /// Print the SQL that was executed
    #[arg(long)]
    pub show_sql: bool,

    /// LLM provider (ollama, groq, mock)
    #[arg(long, value_name = "PROVIDER")]
    pub provider: Option<LlmProvider>,

    /// Model name
    #[arg(long, value_name = "MODEL")]
    pub model: Option<String>,

    /// Ollama base URL
    #[arg(long, value_name = "URL")]
    pub base_url: Option<String>,

    /// Row limit added to queries without a LIMIT clause
    #[arg(long, value_name = "N", value_parser = clap::value_parser!(u32).range(1..))]
    pub limit: Option<u32>,

    /// Output format
    #[arg(long, value_enum, value_name = "FORMAT", default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

/// What `ask` was asked to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AskRequest<'a> {
    /// Run user-supplied SQL.
    Direct(&'a str),
    /// Translate a question.
    Question(&'a str),
}

impl AskArgs {
    /// Returns the request, preferring `--sql` over a question.
    ///
    /// `None` when neither was given (or both are blank).
    pub fn request(&self) -> Option<AskRequest<'_>> {
        fn non_blank(s: &Option<String>) -> Option<&str> {
            s.as_deref().map(str::trim).filter(|s| !s.is_empty())
        }

        non_blank(&self.sql)
            .map(AskRequest::Direct)
            .or_else(|| non_blank(&self.question).map(AskRequest::Question))
    }
}

impl Cli {
    /// Parses command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Returns the config file path to use.
    ///
    /// Uses the --config argument if provided, otherwise the default path.
    pub fn config_path(&self) -> PathBuf {
        self.config.clone().unwrap_or_else(Config::default_path)
    }

    /// Layers environment variables (read through `lookup`) and command-line
    /// flags over `config`.
    ///
    /// `--provider` is applied before the environment, so `LLM_PROVIDER`
    /// cannot replace it and the chosen provider's model variable
    /// (`OLLAMA_MODEL` or `GROQ_MODEL`) still takes effect.
    pub fn resolve_config<F>(&self, mut config: Config, lookup: F) -> Result<Config>
    where
        F: Fn(&str) -> Option<String>,
    {
        let pinned = self.apply_provider(&mut config);
        config.apply_env_overrides_from(|key: &str| {
            if pinned && key == "LLM_PROVIDER" {
                None
            } else {
                lookup(key)
            }
        })?;
        self.apply_overrides(&mut config);
        Ok(config)
    }

    /// Applies command-line overrides on top of file and environment settings.
    ///
    /// Switching provider on the command line without `--model` drops a model
    /// configured for the previous provider.
    pub fn apply_overrides(&self, config: &mut Config) {
        if let Some(db) = &self.db {
            config.database.path = db.clone();
        }

        self.apply_provider(config);
        if let Command::Ask(ask) = &self.command {
            if let Some(model) = &ask.model {
                config.llm.model = Some(model.clone());
            }
            if let Some(base_url) = &ask.base_url {
                config.llm.base_url = base_url.clone();
            }
            if let Some(limit) = ask.limit {
                config.database.default_limit = limit;
            }
        }
    }

    /// Applies `--provider`. Returns whether the flag was given.
    fn apply_provider(&self, config: &mut Config) -> bool {
        let Command::Ask(AskArgs {
            provider: Some(provider),
            model,
            ..
        }) = &self.command
        else {
            return false;
        };

        if *provider != config.llm.provider && model.is_none() {
            config.llm.model = None;
        }
        config.llm.provider = *provider;
        true
    }
}
