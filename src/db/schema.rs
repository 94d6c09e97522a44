//! Database schema types.
//!
//! Holds table and column metadata read from the catalog and renders it as the
//! text given to the model and to the `schema` command.

use serde::{Deserialize, Serialize};

/// Tables of the `main` schema, in catalog order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schema {
    /// All tables in the schema.
    pub tables: Vec<Table>,
}

impl Schema {
    /// Creates a new empty schema.
    pub fn new() -> Self {
        Self::default()
    }

    /// Groups `(table, column, type)` rows into tables.
    ///
    /// Rows must already be ordered by table; columns keep their row order.
    pub fn from_column_rows<I>(rows: I) -> Self
    where
        I: IntoIterator<Item = (String, String, String)>,
    {
        let mut tables: Vec<Table> = Vec::new();

        for (table_name, column_name, data_type) in rows {
            let column = Column::new(column_name, data_type);
            match tables.last_mut() {
                Some(table) if table.name == table_name => table.columns.push(column),
                _ => {
                    let mut table = Table::new(table_name);
                    table.columns.push(column);
                    tables.push(table);
                }
            }
        }

        Self { tables }
    }

    /// Returns true if there are no tables.
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// Formats the schema for inclusion in the model prompt.
    ///
    /// One DDL-like line per table:
    /// `CREATE TABLE orders AS -- columns: id BIGINT, amount DOUBLE`
    pub fn format_for_llm(&self) -> String {
        self.tables
            .iter()
            .map(|table| {
                let columns = table
                    .columns
                    .iter()
                    .map(|column| format!("{} {}", column.name, column.data_type))
                    .collect::<Vec<_>>()
                    .join(", ");
                format!("CREATE TABLE {} AS -- columns: {}", table.name, columns)
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Returns `(table name, comma-joined column names)` pairs.
    pub fn table_listing(&self) -> Vec<(String, String)> {
        self.tables
            .iter()
            .map(|table| {
                let columns = table
                    .columns
                    .iter()
                    .map(|column| column.name.as_str())
                    .collect::<Vec<_>>()
                    .join(", ");
                (table.name.clone(), columns)
            })
            .collect()
    }
}

/// Represents a database table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    /// Table name.
    pub name: String,

    /// Columns in declaration order.
    pub columns: Vec<Column>,
}

impl Table {
    /// Creates a new table with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            columns: Vec::new(),
        }
    }

    /// Adds a column.
    pub fn with_column(mut self, name: impl Into<String>, data_type: impl Into<String>) -> Self {
        self.columns.push(Column::new(name, data_type));
        self
    }
}

/// Represents a column in a table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    /// Column name.
    pub name: String,

    /// Declared type as reported by the catalog (e.g., "BIGINT", "VARCHAR").
    pub data_type: String,
}

impl Column {
    /// Creates a new column with the given name and data type.
    pub fn new(name: impl Into<String>, data_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data_type: data_type.into(),
        }
    }
}
