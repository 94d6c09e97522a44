//! Normalization of raw model output into candidate SQL.
//!
//! Models often wrap the answer in a markdown fence and restate the language
//! tag. The steps below peel those off in a fixed order. Nothing here judges
//! whether the result is SQL at all; the safety gate does that.

/// Language tag some models put right after the opening fence.
const LANGUAGE_TAG: &str = "sql";

/// Extracts a candidate SQL string from a model response.
///
/// 1. Trim whitespace.
/// 2. Strip backticks from both ends, each end independently.
/// 3. Trim whitespace again.
/// 4. Drop a leading `sql` tag (any case), then any colons right after it,
///    then whitespace.
///
/// Never fails. Empty or garbage input yields an empty or garbage string.
pub fn extract_sql(raw: &str) -> String {
    let unfenced = raw.trim().trim_matches('`').trim();

    let candidate = match unfenced.get(..LANGUAGE_TAG.len()) {
        Some(head) if head.eq_ignore_ascii_case(LANGUAGE_TAG) => unfenced
            [LANGUAGE_TAG.len()..]
            .trim_start_matches(':')
            .trim(),
        _ => unfenced,
    };

    candidate.to_string()
}
