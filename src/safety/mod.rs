//! Read-only safety gate for generated and user-supplied SQL.
//!
//! The gate has two layers: a statement-shape check (the text must start with
//! `SELECT` or `WITH`) and a blocklist of surface keywords matched as
//! space-delimited words. It is not a SQL parser. Exotic dialect syntax that
//! avoids every blocked word can still get through; the gate exists to stop the
//! common failure mode of a model emitting DDL or DML, and to stay small enough
//! to audit by eye.
//!
//! [`BoundedSql`] is the only type the executor accepts, and its only
//! constructor runs both the limit enforcer and the gate.

mod gate;
pub mod limit;

pub use gate::{check_select, is_safe_select, BLOCKED_TOKENS};
pub use limit::{ensure_limit, DEFAULT_LIMIT};

use std::fmt;

use crate::error::{Nl2SqlError, Result};

/// Why the gate refused a statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// The statement does not start with `SELECT ` or `WITH `.
    NotASelect,
    /// The statement contains a blocked token (already trimmed of padding).
    BlockedToken(&'static str),
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotASelect => write!(f, "only SELECT or WITH queries are allowed"),
            Self::BlockedToken(";") => write!(f, "multiple statements (';') are not allowed"),
            Self::BlockedToken(token) => write!(f, "blocked keyword {token}"),
        }
    }
}

/// SQL that has a row bound and has passed the safety gate.
///
/// The text is private so that nothing can be executed without going through
/// [`BoundedSql::new`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundedSql(String);

impl BoundedSql {
    /// Bounds `candidate` with `default_limit` and then validates the result.
    ///
    /// The text that is validated is exactly the text that will be executed.
    pub fn new(candidate: &str, default_limit: u32) -> Result<Self> {
        let bounded = ensure_limit(candidate, default_limit);

        check_select(&bounded).map_err(|rejection| {
            tracing::warn!(%rejection, "Rejected query: {}", candidate);
            Nl2SqlError::unsafe_query(rejection.to_string(), candidate)
        })?;

        Ok(Self(bounded))
    }

    /// Returns the SQL text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the wrapper and returns the SQL text.
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl AsRef<str> for BoundedSql {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BoundedSql {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
