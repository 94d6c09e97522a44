//! Query execution integration tests.
//!
//! Tests bounded query execution and value conversion against DuckDB.

use super::common::Fixture;
use nl2sql_duck::db::{DatabaseClient, Value};
use nl2sql_duck::error::Nl2SqlError;
use nl2sql_duck::safety::BoundedSql;

fn bounded(sql: &str) -> BoundedSql {
    BoundedSql::new(sql, 50).unwrap()
}

#[tokio::test]
async fn test_execute_simple_select() {
    let fixture = Fixture::empty();

    let result = fixture
        .db
        .execute(&bounded("SELECT 1 AS num, 'hello' AS greeting"))
        .await
        .unwrap();

    assert_eq!(result.column_names(), vec!["num", "greeting"]);
    assert_eq!(result.row_count, 1);
    assert_eq!(result.rows[0], vec![Value::Int(1), Value::from("hello")]);
}

#[tokio::test]
async fn test_execute_count() {
    let fixture = Fixture::with_orders().await;

    let result = fixture
        .db
        .execute(&bounded("SELECT COUNT(*) AS total FROM orders"))
        .await
        .unwrap();

    assert_eq!(result.rows, vec![vec![Value::Int(4)]]);
    assert_eq!(result.columns[0].data_type, "integer");
}

#[tokio::test]
async fn test_execute_converts_column_types() {
    let fixture = Fixture::with_orders().await;

    let result = fixture
        .db
        .execute(&bounded(
            "SELECT id, customer, amount, order_date FROM orders ORDER BY id",
        ))
        .await
        .unwrap();

    let first = &result.rows[0];
    assert_eq!(first[0], Value::Int(1));
    assert_eq!(first[1], Value::from("Alice"));
    assert_eq!(first[2], Value::Float(120.5));
    assert_eq!(first[3], Value::from("2024-01-03"));
}

#[tokio::test]
async fn test_execute_hugeint_sum() {
    let fixture = Fixture::with_orders().await;

    let result = fixture
        .db
        .execute(&bounded("SELECT SUM(id) AS s FROM orders"))
        .await
        .unwrap();

    assert_eq!(result.rows, vec![vec![Value::Int(10)]]);
}

#[tokio::test]
async fn test_execute_null_and_bool() {
    let fixture = Fixture::empty();

    let result = fixture
        .db
        .execute(&bounded("SELECT NULL AS missing, TRUE AS flag"))
        .await
        .unwrap();

    assert_eq!(result.rows[0], vec![Value::Null, Value::Bool(true)]);
    assert_eq!(result.columns[0].data_type, "null");
}

#[tokio::test]
async fn test_default_limit_bounds_rows() {
    let fixture = Fixture::with_orders().await;

    let sql = BoundedSql::new("SELECT * FROM orders", 2).unwrap();
    let result = fixture.db.execute(&sql).await.unwrap();

    assert_eq!(result.row_count, 2);
}

#[tokio::test]
async fn test_existing_limit_is_respected() {
    let fixture = Fixture::with_orders().await;

    let sql = BoundedSql::new("SELECT * FROM orders LIMIT 3", 1).unwrap();
    let result = fixture.db.execute(&sql).await.unwrap();

    assert_eq!(result.row_count, 3);
}

#[tokio::test]
async fn test_cte_query() {
    let fixture = Fixture::with_orders().await;

    let sql = bounded(
        "WITH totals AS (SELECT customer, SUM(amount) AS total FROM orders GROUP BY customer) \
         SELECT customer FROM totals ORDER BY total DESC",
    );
    let result = fixture.db.execute(&sql).await.unwrap();

    assert_eq!(result.row_count, 3);
    assert_eq!(result.rows[0][0], Value::from("Carla"));
}

#[tokio::test]
async fn test_empty_result_keeps_columns() {
    let fixture = Fixture::with_orders().await;

    let result = fixture
        .db
        .execute(&bounded("SELECT id FROM orders WHERE amount > 1000"))
        .await
        .unwrap();

    assert!(result.is_empty());
    assert_eq!(result.column_names(), vec!["id"]);
}

#[tokio::test]
async fn test_engine_error_is_query_error() {
    let fixture = Fixture::empty();

    let err = fixture
        .db
        .execute(&bounded("SELECT * FROM no_such_table"))
        .await
        .unwrap_err();

    assert!(matches!(err, Nl2SqlError::Query(_)));
    assert!(err.to_string().contains("no_such_table"));
}

#[tokio::test]
async fn test_long_scan_runs_to_completion() {
    let fixture = Fixture::empty();

    let result = fixture
        .db
        .execute(&bounded(
            "SELECT COUNT(*) AS n, MAX(range) AS top FROM range(5000000)",
        ))
        .await
        .unwrap();

    assert_eq!(result.rows, vec![vec![Value::Int(5_000_000), Value::Int(4_999_999)]]);
}
