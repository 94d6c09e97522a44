//! CSV loading integration tests.

use super::common::Fixture;
use nl2sql_duck::db::{DatabaseClient, DuckDbClient};
use nl2sql_duck::error::Nl2SqlError;

#[tokio::test]
async fn test_load_csv_returns_row_count() {
    let fixture = Fixture::empty();
    let rows = fixture.db.load_csv(&fixture.csv, "orders").await.unwrap();
    assert_eq!(rows, 4);
}

#[tokio::test]
async fn test_load_csv_replaces_existing_table() {
    let fixture = Fixture::with_orders().await;
    let rows = fixture.db.load_csv(&fixture.csv, "orders").await.unwrap();
    assert_eq!(rows, 4);

    let tables = fixture.db.list_tables().await.unwrap();
    assert_eq!(tables.len(), 1);
}

#[tokio::test]
async fn test_load_csv_into_custom_table() {
    let fixture = Fixture::empty();
    fixture.db.load_csv(&fixture.csv, "sales_2024").await.unwrap();

    let tables = fixture.db.list_tables().await.unwrap();
    assert_eq!(tables[0].0, "sales_2024");
}

#[tokio::test]
async fn test_load_csv_rejects_injection_in_table_name() {
    let fixture = Fixture::empty();
    let err = fixture
        .db
        .load_csv(&fixture.csv, "orders AS SELECT 1; DROP TABLE x")
        .await
        .unwrap_err();

    assert!(matches!(err, Nl2SqlError::Config(_)));
    assert!(fixture.db.list_tables().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_data_persists_across_clients() {
    let fixture = Fixture::with_orders().await;
    let reopened = DuckDbClient::open(fixture.db.path()).unwrap();

    let tables = reopened.list_tables().await.unwrap();
    assert_eq!(tables[0].0, "orders");
}
