//! Output formatting for the command line.
//!
//! Provides two output formats for query results: a plain-text table and
//! JSON. Schema listings are always plain text.

use serde::Serialize;

use crate::db::{QueryResult, Value};
use crate::pipeline::Answer;

/// Output format for `ask`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Aligned plain-text table.
    #[default]
    Text,
    /// JSON object with the SQL, columns and rows.
    Json,
}

/// Message printed when a query returns no rows.
pub const NO_RESULTS: &str = "No results.";

/// Renders a result set as an aligned plain-text table.
///
/// Column widths come from the widest cell (or header) in each column.
/// An empty result renders as [`NO_RESULTS`].
pub fn render_table(result: &QueryResult) -> String {
    if result.is_empty() {
        return format!("{NO_RESULTS}\n");
    }

    let headers: Vec<String> = result.columns.iter().map(|c| c.name.clone()).collect();
    let cells: Vec<Vec<String>> = result
        .rows
        .iter()
        .map(|row| row.iter().map(Value::to_display_string).collect())
        .collect();

    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in &cells {
        for (idx, cell) in row.iter().enumerate() {
            if let Some(width) = widths.get_mut(idx) {
                *width = (*width).max(cell.chars().count());
            }
        }
    }

    let mut out = String::new();
    out.push_str(&format_line(&headers, &widths));
    out.push_str(
        &widths
            .iter()
            .map(|w| "-".repeat(*w))
            .collect::<Vec<_>>()
            .join("-+-"),
    );
    out.push('\n');
    for row in &cells {
        out.push_str(&format_line(row, &widths));
    }

    let noun = if result.row_count == 1 { "row" } else { "rows" };
    out.push_str(&format!("({} {noun})\n", result.row_count));
    out
}

fn format_line(cells: &[String], widths: &[usize]) -> String {
    let line = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| format!("{cell:<width$}"))
        .collect::<Vec<_>>()
        .join(" | ");
    format!("{}\n", line.trim_end())
}

/// Renders `(table, columns)` pairs, one table per line.
pub fn render_schema_listing(tables: &[(String, String)]) -> String {
    tables
        .iter()
        .map(|(table, columns)| format!("- {table}: {columns}\n"))
        .collect()
}

#[derive(Debug, Serialize)]
struct JsonAnswer<'a> {
    sql: &'a str,
    columns: Vec<&'a str>,
    rows: Vec<Vec<serde_json::Value>>,
    row_count: usize,
    execution_time_ms: u64,
}

/// Renders an answer in the requested format.
///
/// In text format the SQL is printed above the table only when `show_sql` is
/// set; JSON always includes it.
pub fn render_answer(answer: &Answer, format: OutputFormat, show_sql: bool) -> String {
    match format {
        OutputFormat::Text => {
            let table = render_table(&answer.result);
            if show_sql {
                format!("SQL: {}\n\n{table}", answer.sql)
            } else {
                table
            }
        }
        OutputFormat::Json => {
            let json = JsonAnswer {
                sql: answer.sql.as_str(),
                columns: answer.result.column_names(),
                rows: answer
                    .result
                    .rows
                    .iter()
                    .map(|row| row.iter().map(json_value).collect())
                    .collect(),
                row_count: answer.result.row_count,
                execution_time_ms: answer.result.execution_time.as_millis() as u64,
            };
            let mut text = serde_json::to_string_pretty(&json)
                .unwrap_or_else(|e| format!("{{\"error\": \"Failed to serialize: {e}\"}}"));
            text.push('\n');
            text
        }
    }
}

fn json_value(value: &Value) -> serde_json::Value {
    match value {
        Value::Null => serde_json::Value::Null,
        Value::Bool(b) => serde_json::Value::from(*b),
        Value::Int(i) => serde_json::Value::from(*i),
        Value::Float(f) => serde_json::Value::from(*f),
        Value::String(s) => serde_json::Value::from(s.as_str()),
        Value::Bytes(_) => serde_json::Value::from(value.to_display_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::ColumnInfo;
    use crate::safety::BoundedSql;
    use pretty_assertions::assert_eq;

    fn sample() -> QueryResult {
        QueryResult::with_data(
            vec![
                ColumnInfo::new("customer", "text"),
                ColumnInfo::new("total", "double"),
            ],
            vec![
                vec![Value::from("Alice"), Value::Float(120.5)],
                vec![Value::from("Bo"), Value::Null],
            ],
        )
    }

    #[test]
    fn test_render_table() {
        assert_eq!(
            render_table(&sample()),
            "customer | total\n\
             ---------+------\n\
             Alice    | 120.5\n\
             Bo       | NULL\n\
             (2 rows)\n"
        );
    }

    #[test]
    fn test_render_table_single_row() {
        let result = QueryResult::with_data(
            vec![ColumnInfo::new("n", "integer")],
            vec![vec![Value::Int(7)]],
        );
        assert_eq!(render_table(&result), "n\n-\n7\n(1 row)\n");
    }

    #[test]
    fn test_render_table_empty() {
        assert_eq!(render_table(&QueryResult::new()), "No results.\n");
    }

    #[test]
    fn test_render_schema_listing() {
        let tables = vec![
            ("customers".to_string(), "id, name".to_string()),
            ("orders".to_string(), "id, amount".to_string()),
        ];
        assert_eq!(
            render_schema_listing(&tables),
            "- customers: id, name\n- orders: id, amount\n"
        );
    }

    #[test]
    fn test_render_answer_text_with_sql() {
        let answer = Answer {
            sql: BoundedSql::new("SELECT 7 AS n", 50).unwrap(),
            result: QueryResult::with_data(
                vec![ColumnInfo::new("n", "integer")],
                vec![vec![Value::Int(7)]],
            ),
        };
        let text = render_answer(&answer, OutputFormat::Text, true);
        assert!(text.starts_with("SQL: SELECT 7 AS n LIMIT 50\n\n"));
        assert!(text.ends_with("(1 row)\n"));

        let plain = render_answer(&answer, OutputFormat::Text, false);
        assert!(!plain.contains("SQL:"));
    }

    #[test]
    fn test_render_answer_json() {
        let answer = Answer {
            sql: BoundedSql::new("SELECT 7 AS n", 50).unwrap(),
            result: QueryResult::with_data(
                vec![ColumnInfo::new("n", "integer")],
                vec![vec![Value::Int(7)]],
            ),
        };
        let json: serde_json::Value =
            serde_json::from_str(&render_answer(&answer, OutputFormat::Json, false)).unwrap();
        assert_eq!(json["sql"], "SELECT 7 AS n LIMIT 50");
        assert_eq!(json["columns"][0], "n");
        assert_eq!(json["rows"][0][0], 7);
        assert_eq!(json["row_count"], 1);
    }
}
