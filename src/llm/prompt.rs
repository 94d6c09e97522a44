//! Prompt construction for SQL generation.
//!
//! Combines a fixed instruction set, the schema rendering, and the user's
//! question. Pure string formatting: nothing here rejects input.

/// Fixed system instruction for the SQL translator.
pub const SYSTEM_PROMPT: &str = "You are an NL2SQL translator for DuckDB. \
Generate ONLY valid DuckDB SQL, with no comments and no explanations. \
Do not use DDL or DML, only SELECT statements or CTEs (WITH). \
Avoid unsupported functions. \
Use table and column names exactly as they appear in the schema.";

/// System and user prompts for one generation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompts {
    pub system: String,
    pub user: String,
}

/// Builds the prompts for `question` against `schema_text`.
///
/// Both inputs are interpolated verbatim.
pub fn build_prompts(question: &str, schema_text: &str) -> Prompts {
    Prompts {
        system: SYSTEM_PROMPT.to_string(),
        user: build_user_prompt(question, schema_text),
    }
}

fn build_user_prompt(question: &str, schema_text: &str) -> String {
    format!(
        "Table schema (DuckDB):\n\
         {schema_text}\n\
         \n\
         Task: Write a single SQL query (DuckDB) that answers the question.\n\
         Rules: SQL ONLY. Must start with SELECT or WITH. No comments.\n\
         \n\
         Question: {question}\n"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const SCHEMA: &str =
        "CREATE TABLE orders AS -- columns: id BIGINT, customer VARCHAR, amount DOUBLE";

    #[test]
    fn test_system_prompt_is_fixed() {
        let a = build_prompts("total sales", SCHEMA);
        let b = build_prompts("something else entirely", "");
        assert_eq!(a.system, b.system);
        assert_eq!(a.system, SYSTEM_PROMPT);
    }

    #[test]
    fn test_system_prompt_contains_rules() {
        assert!(SYSTEM_PROMPT.contains("DuckDB"));
        assert!(SYSTEM_PROMPT.contains("ONLY valid DuckDB SQL"));
        assert!(SYSTEM_PROMPT.contains("no comments"));
        assert!(SYSTEM_PROMPT.contains("only SELECT"));
        assert!(SYSTEM_PROMPT.contains("exactly as they appear in the schema"));
    }

    #[test]
    fn test_user_prompt_layout() {
        let prompts = build_prompts("What is the total amount per customer?", SCHEMA);
        let expected = format!(
            "Table schema (DuckDB):\n{SCHEMA}\n\n\
             Task: Write a single SQL query (DuckDB) that answers the question.\n\
             Rules: SQL ONLY. Must start with SELECT or WITH. No comments.\n\n\
             Question: What is the total amount per customer?\n"
        );
        assert_eq!(prompts.user, expected);
    }

    #[test]
    fn test_inputs_are_interpolated_verbatim() {
        let question = "drop everything; {schema} `rm -rf`";
        let schema = "weird {question} schema";
        let prompts = build_prompts(question, schema);

        assert!(prompts.user.contains(question));
        assert!(prompts.user.contains(schema));
    }

    #[test]
    fn test_empty_inputs_are_accepted() {
        let prompts = build_prompts("", "");
        assert!(prompts.user.starts_with("Table schema (DuckDB):\n\n"));
        assert!(prompts.user.ends_with("Question: \n"));
    }
}
