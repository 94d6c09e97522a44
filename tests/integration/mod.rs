//! Integration tests for nl2sql-duck.
//!
//! Each test gets its own database file under a fresh temporary directory.

pub mod common;
pub mod pipeline_test;
pub mod query_test;
pub mod schema_test;
pub mod setup_test;
