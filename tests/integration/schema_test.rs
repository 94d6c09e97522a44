//! Schema introspection integration tests.

use super::common::Fixture;
use nl2sql_duck::db::DatabaseClient;

#[tokio::test]
async fn test_empty_database_has_no_tables() {
    let fixture = Fixture::empty();

    let schema = fixture.db.introspect_schema().await.unwrap();
    assert!(schema.is_empty());
    assert_eq!(fixture.db.describe_schema().await.unwrap(), "");
    assert!(fixture.db.list_tables().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_list_tables_orders_columns_by_position() {
    let fixture = Fixture::with_orders().await;

    let tables = fixture.db.list_tables().await.unwrap();
    assert_eq!(
        tables,
        vec![(
            "orders".to_string(),
            "id, customer, amount, order_date".to_string()
        )]
    );
}

#[tokio::test]
async fn test_describe_schema_includes_types() {
    let fixture = Fixture::with_orders().await;

    let text = fixture.db.describe_schema().await.unwrap();
    assert!(text.starts_with("CREATE TABLE orders AS -- columns: "));
    assert!(text.contains("id BIGINT"));
    assert!(text.contains("customer VARCHAR"));
    assert!(text.contains("order_date DATE"));
    assert_eq!(text.lines().count(), 1);
}

#[tokio::test]
async fn test_tables_are_sorted_by_name() {
    let fixture = Fixture::with_orders().await;
    fixture.db.load_csv(&fixture.csv, "archive").await.unwrap();

    let schema = fixture.db.introspect_schema().await.unwrap();
    let names: Vec<&str> = schema.tables.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, vec!["archive", "orders"]);
    assert_eq!(fixture.db.describe_schema().await.unwrap().lines().count(), 2);
}
