//! Row-count bound enforcement.

use regex::Regex;
use std::sync::OnceLock;

/// Row bound appended when a query has none.
pub const DEFAULT_LIMIT: u32 = 50;

fn limit_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(?i)\blimit\b").expect("limit pattern is valid"))
}

/// Guarantees that `sql` carries a `LIMIT` clause.
///
/// Text that already mentions `LIMIT` anywhere is returned unchanged, which
/// makes the function idempotent. Otherwise trailing whitespace and one
/// trailing `;` are removed and ` LIMIT {default_limit}` is appended.
///
/// This does not check safety.
pub fn ensure_limit(sql: &str, default_limit: u32) -> String {
    if limit_pattern().is_match(sql) {
        return sql.to_string();
    }

    let trimmed = sql.trim_end();
    let body = trimmed.strip_suffix(';').unwrap_or(trimmed);
    format!("{body} LIMIT {default_limit}")
}
