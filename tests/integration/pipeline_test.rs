//! End-to-end pipeline tests against DuckDB with the mock model.

use super::common::Fixture;
use nl2sql_duck::db::{DatabaseClient, Value};
use nl2sql_duck::llm::MockLlmClient;
use nl2sql_duck::{pipeline, Nl2Sql};

fn nl2sql(client: MockLlmClient) -> Nl2Sql {
    Nl2Sql::new(Box::new(client), 50)
}

#[tokio::test]
async fn test_question_to_rows() {
    let fixture = Fixture::with_orders().await;

    let answer = nl2sql(MockLlmClient::new())
        .answer("How many orders are there?", &fixture.db)
        .await
        .unwrap();

    assert_eq!(
        answer.sql.as_str(),
        "SELECT COUNT(*) AS total_orders FROM orders LIMIT 50"
    );
    assert_eq!(answer.result.column_names(), vec!["total_orders"]);
    assert_eq!(answer.result.rows, vec![vec![Value::Int(4)]]);
}

#[tokio::test]
async fn test_model_sees_live_schema() {
    let fixture = Fixture::with_orders().await;
    let client = MockLlmClient::new();

    nl2sql(client.clone())
        .answer("show orders", &fixture.db)
        .await
        .unwrap();

    let (_, user) = &client.requests()[0];
    assert!(user.contains("CREATE TABLE orders AS -- columns: id BIGINT"));
}

#[tokio::test]
async fn test_group_by_question() {
    let fixture = Fixture::with_orders().await;

    let answer = nl2sql(MockLlmClient::new())
        .answer("total amount per customer", &fixture.db)
        .await
        .unwrap();

    assert_eq!(answer.result.row_count, 3);
    assert_eq!(answer.result.rows[0][0], Value::from("Carla"));
}

#[tokio::test]
async fn test_destructive_answer_leaves_data_intact() {
    let fixture = Fixture::with_orders().await;

    let err = nl2sql(MockLlmClient::new())
        .answer("delete everything", &fixture.db)
        .await
        .unwrap_err();
    assert!(err.is_unsafe_query());

    let err = nl2sql(MockLlmClient::new())
        .answer("drop it", &fixture.db)
        .await
        .unwrap_err();
    assert!(err.is_unsafe_query());

    assert_eq!(fixture.db.list_tables().await.unwrap().len(), 1);
    let count = pipeline::run_direct("SELECT COUNT(*) FROM orders", 50, &fixture.db)
        .await
        .unwrap();
    assert_eq!(count.result.rows, vec![vec![Value::Int(4)]]);
}

#[tokio::test]
async fn test_direct_sql_is_gated() {
    let fixture = Fixture::with_orders().await;

    let err = pipeline::run_direct("DELETE FROM orders", 50, &fixture.db)
        .await
        .unwrap_err();
    assert!(err.is_unsafe_query());

    let answer = pipeline::run_direct("select customer from orders;", 2, &fixture.db)
        .await
        .unwrap();
    assert_eq!(answer.sql.as_str(), "select customer from orders LIMIT 2");
    assert_eq!(answer.result.row_count, 2);
}
