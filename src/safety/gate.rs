//! Statement-shape and keyword-blocklist checks.

use super::Rejection;

/// Tokens that make a statement inadmissible.
///
/// Words are padded with spaces so they only match as whole words in the
/// normalized text. The statement separator matches anywhere.
pub const BLOCKED_TOKENS: &[&str] = &[
    ";", " INSERT ", " UPDATE ", " DELETE ", " DROP ", " CREATE ", " ALTER ", " COPY ",
    " PRAGMA ", " ATTACH ", " DETACH ", " SYSTEM ", " LOAD ", " REPLACE ", " MERGE ",
];

/// Returns true if `sql` is an admissible read query.
///
/// Total: never panics, never errors.
pub fn is_safe_select(sql: &str) -> bool {
    check_select(sql).is_ok()
}

/// Checks `sql` against the gate, returning the first rule it breaks.
pub fn check_select(sql: &str) -> Result<(), Rejection> {
    let normalized = format!(" {} ", sql.trim().to_uppercase());

    let head = normalized.trim_start();
    if !(head.starts_with("WITH ") || head.starts_with("SELECT ")) {
        return Err(Rejection::NotASelect);
    }

    match BLOCKED_TOKENS
        .iter()
        .find(|token| normalized.contains(**token))
    {
        Some(&token) => Err(Rejection::BlockedToken(token.trim())),
        None => Ok(()),
    }
}
