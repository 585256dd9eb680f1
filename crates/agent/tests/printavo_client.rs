//! Printavo client tests against a local mock GraphQL server.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use std::io::Write;
use std::sync::{Arc, Mutex};

use mockito::{Matcher, Server, ServerGuard};
use printavo_agent::config::PrintavoConfig;
use printavo_agent::printavo::{OrderSource, PrintavoClient, UpstreamError};
use rust_decimal::Decimal;
use secrecy::SecretString;
use serde_json::json;
use tracing_subscriber::layer::SubscriberExt;

fn client_for(server: &ServerGuard) -> PrintavoClient {
    PrintavoClient::new(&PrintavoConfig {
        api_url: url::Url::parse(&server.url()).unwrap(),
        email: "ops@example.com".to_string(),
        token: SecretString::from("test-token"),
    })
}

fn order_node(visual_id: &str, total: serde_json::Value) -> serde_json::Value {
    json!({
        "node": {
            "id": format!("order-{visual_id}"),
            "name": "Test Order",
            "visualId": visual_id,
            "createdAt": "2023-01-01T00:00:00Z",
            "updatedAt": "2023-01-02T00:00:00Z",
            "dueDate": "2023-01-10T00:00:00Z",
            "status": {"id": "status1", "name": "In Progress", "color": "blue"},
            "customer": {"id": "customer1", "name": "Test Customer", "email": "test@example.com"},
            "total": total
        }
    })
}

#[tokio::test]
async fn test_search_orders_sends_auth_headers_and_filter_tokens() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/graphql")
        .match_header("content-type", "application/json")
        .match_header("email", "ops@example.com")
        .match_header("token", "test-token")
        .match_body(Matcher::PartialJson(json!({
            "operationName": "SearchOrders",
            "variables": {"query": "tees -status:completed -status:quote", "first": 10}
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "data": {"orders": {"edges": [
                    order_node("1234", json!("100.00")),
                    order_node("1235", json!(null))
                ]}}
            })
            .to_string(),
        )
        .create_async()
        .await;

    let orders = client_for(&server)
        .search_orders("tees", true, true, 10)
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(orders.len(), 2);
    assert_eq!(orders[0].visual_id, "1234");
    assert_eq!(orders[0].total, Decimal::new(10000, 2));
    assert_eq!(orders[0].customer_name(), "Test Customer");
    assert_eq!(orders[1].total, Decimal::ZERO);
}

#[tokio::test]
async fn test_search_orders_without_filters_sends_free_text_only() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/graphql")
        .match_body(Matcher::PartialJson(json!({
            "variables": {"query": "hoodies", "first": 5}
        })))
        .with_status(200)
        .with_body(r#"{"data": {"orders": {"edges": []}}}"#)
        .create_async()
        .await;

    let orders = client_for(&server)
        .search_orders("hoodies", false, false, 5)
        .await
        .unwrap();

    mock.assert_async().await;
    assert!(orders.is_empty());
}

#[tokio::test]
async fn test_search_orders_null_connection_is_empty() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", "/graphql")
        .with_status(200)
        .with_body(r#"{"data": {"orders": null}}"#)
        .create_async()
        .await;

    let orders = client_for(&server)
        .search_orders("", true, true, 10)
        .await
        .unwrap();

    assert!(orders.is_empty());
}

#[tokio::test]
async fn test_get_order_by_visual_id_uses_invoice_shape() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/graphql")
        .match_body(Matcher::PartialJson(json!({
            "operationName": "GetOrderByVisualId",
            "variables": {"query": "5678"}
        })))
        .with_status(200)
        .with_body(
            json!({
                "data": {"invoices": {"edges": [{
                    "node": {
                        "id": "inv1",
                        "name": "Invoice",
                        "visualId": "5678",
                        "createdAt": "2023-03-15T10:00:00Z",
                        "updatedAt": null,
                        "total": 250.5,
                        "status": {"id": "s2", "name": "Invoiced", "color": "#00ff00"},
                        "contact": {"id": "c9", "fullName": "Jane Doe", "email": "jane@example.com"}
                    }
                }]}}
            })
            .to_string(),
        )
        .create_async()
        .await;

    let order = client_for(&server)
        .get_order_by_visual_id("  5678 ")
        .await
        .unwrap()
        .unwrap();

    mock.assert_async().await;
    assert_eq!(order.visual_id, "5678");
    assert_eq!(order.customer.id, "c9");
    assert_eq!(order.customer_name(), "Jane Doe");
    assert_eq!(order.total, Decimal::new(2505, 1));
    assert_eq!(order.status.name, "Invoiced");
}

#[tokio::test]
async fn test_get_order_by_visual_id_no_match_is_none() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", "/graphql")
        .with_status(200)
        .with_body(r#"{"data": {"invoices": {"edges": []}}}"#)
        .create_async()
        .await;

    let order = client_for(&server)
        .get_order_by_visual_id("9999")
        .await
        .unwrap();

    assert!(order.is_none());
}

#[tokio::test]
async fn test_graphql_errors_fail_even_with_200() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", "/graphql")
        .with_status(200)
        .with_body(
            r#"{"data": null, "errors": [{"message": "Field 'foo' doesn't exist", "locations": [{"line": 1, "column": 2}]}]}"#,
        )
        .create_async()
        .await;

    let err = client_for(&server)
        .search_orders("x", true, true, 10)
        .await
        .unwrap_err();

    match err {
        UpstreamError::GraphQL(errors) => {
            assert_eq!(errors.len(), 1);
            assert_eq!(errors[0].message, "Field 'foo' doesn't exist");
            assert_eq!(errors[0].locations[0].column, 2);
        }
        other => panic!("expected GraphQL error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_server_error_status() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", "/graphql")
        .with_status(500)
        .with_body("Internal Server Error")
        .create_async()
        .await;

    let err = client_for(&server).list_statuses().await.unwrap_err();

    assert!(matches!(
        err,
        UpstreamError::Status { status: 500, ref body } if body == "Internal Server Error"
    ));
}

#[tokio::test]
async fn test_rate_limited_reads_retry_after() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", "/graphql")
        .with_status(429)
        .with_header("Retry-After", "12")
        .create_async()
        .await;

    let err = client_for(&server).list_statuses().await.unwrap_err();

    assert!(matches!(err, UpstreamError::RateLimited(12)));
}

#[tokio::test]
async fn test_unauthorized() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", "/graphql")
        .with_status(401)
        .create_async()
        .await;

    let err = client_for(&server)
        .get_order_by_visual_id("1")
        .await
        .unwrap_err();

    assert!(matches!(err, UpstreamError::Unauthorized(_)));
}

#[tokio::test]
async fn test_missing_data_without_errors() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", "/graphql")
        .with_status(200)
        .with_body(r#"{"data": null}"#)
        .create_async()
        .await;

    let err = client_for(&server).list_statuses().await.unwrap_err();

    assert!(matches!(err, UpstreamError::MissingData));
}

#[tokio::test]
async fn test_invalid_json_body_is_parse_error() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", "/graphql")
        .with_status(200)
        .with_body("<html>maintenance</html>")
        .create_async()
        .await;

    let err = client_for(&server).list_statuses().await.unwrap_err();

    assert!(matches!(err, UpstreamError::Parse(_)));
}

#[derive(Clone, Default)]
struct LogSink(Arc<Mutex<Vec<u8>>>);

impl Write for LogSink {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

#[tokio::test]
async fn test_unparseable_total_fails_whole_search() {
    let sink = LogSink::default();
    let writer = {
        let sink = sink.clone();
        move || sink.clone()
    };
    let subscriber = tracing_subscriber::registry().with(
        tracing_subscriber::fmt::layer()
            .with_writer(writer)
            .with_ansi(false),
    );
    let _guard = tracing::subscriber::set_default(subscriber);

    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", "/graphql")
        .with_status(200)
        .with_body(
            json!({
                "data": {"orders": {"edges": [
                    order_node("1", json!("10.00")),
                    order_node("2", json!("n/a"))
                ]}}
            })
            .to_string(),
        )
        .create_async()
        .await;

    let err = client_for(&server)
        .search_orders("", true, true, 10)
        .await
        .unwrap_err();

    assert!(matches!(err, UpstreamError::Normalize { .. }));

    let output = String::from_utf8(sink.0.lock().unwrap().clone()).unwrap();
    let logged = output
        .lines()
        .find(|line| line.contains("Printavo query failed"))
        .unwrap_or_else(|| panic!("no failure logged: {output}"));
    assert!(logged.contains("ERROR"));
    assert!(logged.contains("operation=\"search_orders\""));
    assert!(logged.contains("Invalid order total: n/a"));
}

#[tokio::test]
async fn test_list_statuses_is_repeatable() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/graphql")
        .match_body(Matcher::PartialJson(json!({"operationName": "GetStatuses"})))
        .with_status(200)
        .with_body(
            json!({
                "data": {"statuses": {"edges": [
                    {"node": {"id": "s1", "name": "Quote", "color": "#cccccc"}},
                    {"node": {"id": "s2", "name": "Completed", "color": null}}
                ]}}
            })
            .to_string(),
        )
        .expect(2)
        .create_async()
        .await;

    // Through the trait object, as the agent tools call it.
    let client = client_for(&server);
    let source: &dyn OrderSource = &client;
    let first = source.list_statuses().await.unwrap();
    let second = source.list_statuses().await.unwrap();

    mock.assert_async().await;
    assert_eq!(first, second);
    assert_eq!(first.len(), 2);
    assert_eq!(first[0].name, "Quote");
    assert!(first[1].color.is_none());
}
