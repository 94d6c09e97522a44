//! Shared fixtures for the DuckDB integration tests.

use std::path::PathBuf;

use nl2sql_duck::db::DuckDbClient;
use tempfile::TempDir;

/// Sample order data with integer, text, decimal and date columns.
pub const ORDERS_CSV: &str = "\
id,customer,amount,order_date
1,Alice,120.5,2024-01-03
2,Bob,80.25,2024-01-04
3,Alice,42.25,2024-02-10
4,Carla,300.5,2024-02-11
";

/// A database file and CSV living in a temporary directory.
///
/// The directory is removed when the fixture is dropped.
pub struct Fixture {
    pub dir: TempDir,
    pub db: DuckDbClient,
    pub csv: PathBuf,
}

impl Fixture {
    /// Creates an empty database (no tables) with the sample CSV next to it.
    pub fn empty() -> Self {
        let dir = tempfile::tempdir().expect("create temp dir");
        let csv = dir.path().join("orders.csv");
        std::fs::write(&csv, ORDERS_CSV).expect("write sample csv");
        let db = DuckDbClient::open(dir.path().join("db").join("test.duckdb"))
            .expect("open duckdb");
        Self { dir, db, csv }
    }

    /// Creates a database with the sample CSV loaded into `orders`.
    pub async fn with_orders() -> Self {
        let fixture = Self::empty();
        fixture
            .db
            .load_csv(&fixture.csv, "orders")
            .await
            .expect("load sample csv");
        fixture
    }
}
