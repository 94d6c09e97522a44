//! Error types for nl2sql-duck.
//!
//! Every layer reports exactly one of these to its caller. Nothing is swallowed
//! and nothing is retried.

use thiserror::Error;

/// Main error type for nl2sql-duck operations.
#[derive(Error, Debug)]
pub enum Nl2SqlError {
    /// Missing or invalid configuration (credentials, model ids, paths, env values).
    #[error("Configuration error: {0}")]
    Config(String),

    /// The language model gateway failed (transport, auth, bad response).
    #[error("LLM error: {0}")]
    Llm(String),

    /// The safety gate rejected a candidate query. The SQL is kept for display only.
    #[error("Unsafe query blocked: {reason}")]
    UnsafeQuery { reason: String, sql: String },

    /// The database engine failed on a statement that passed the safety gate.
    #[error("Query error: {0}")]
    Query(String),

    /// The database file could not be opened or created.
    #[error("Connection error: {0}")]
    Connection(String),

    /// Internal application errors (unexpected states, bugs, etc.)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Nl2SqlError {
    /// Creates a configuration error with the given message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Creates an LLM error with the given message.
    pub fn llm(msg: impl Into<String>) -> Self {
        Self::Llm(msg.into())
    }

    /// Creates an unsafe-query rejection for `sql`.
    pub fn unsafe_query(reason: impl Into<String>, sql: impl Into<String>) -> Self {
        Self::UnsafeQuery {
            reason: reason.into(),
            sql: sql.into(),
        }
    }

    /// Creates a query error with the given message.
    pub fn query(msg: impl Into<String>) -> Self {
        Self::Query(msg.into())
    }

    /// Creates a connection error with the given message.
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::Connection(msg.into())
    }

    /// Creates an internal error with the given message.
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Returns the error category as a string for display purposes.
    pub fn category(&self) -> &'static str {
        match self {
            Self::Config(_) => "Configuration Error",
            Self::Llm(_) => "LLM Error",
            Self::UnsafeQuery { .. } => "Unsafe Query",
            Self::Query(_) => "Query Error",
            Self::Connection(_) => "Connection Error",
            Self::Internal(_) => "Internal Error",
        }
    }

    /// Returns true if this error came from the safety gate.
    pub fn is_unsafe_query(&self) -> bool {
        matches!(self, Self::UnsafeQuery { .. })
    }
}

impl From<duckdb::Error> for Nl2SqlError {
    fn from(err: duckdb::Error) -> Self {
        Self::Query(err.to_string())
    }
}

/// Result type alias using Nl2SqlError.
pub type Result<T> = std::result::Result<T, Nl2SqlError>;
