//! nl2sql-duck - ask questions of a DuckDB database in plain language.
//!
//! A question and the database schema go to a language model; the reply is
//! reduced to a single SQL statement, bounded with a row limit, checked by a
//! read-only safety gate and only then executed.
//!
//! This library exposes the core modules for the binary and integration tests.

pub mod cli;
pub mod config;
pub mod db;
pub mod error;
pub mod llm;
pub mod logging;
pub mod output;
pub mod pipeline;
pub mod safety;

pub use error::{Nl2SqlError, Result};
pub use pipeline::{Answer, Nl2Sql};
pub use safety::BoundedSql;
