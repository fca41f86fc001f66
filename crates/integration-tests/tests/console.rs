//! Query console and health routes.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use axum::http::StatusCode;
use serde_json::json;

use record_console_admin::config::RawQueryConfig;
use record_console_integration_tests::TestConsole;

#[tokio::test]
async fn console_page_renders_with_navigation() {
    let console = TestConsole::new();

    let response = console.get("/").await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.contains("Query Console"));
    for path in ["/users", "/categories", "/products", "/orders", "/order_items"] {
        assert!(response.body.contains(&format!("href=\"{path}\"")), "{path}");
    }
}

#[tokio::test]
async fn failing_query_renders_single_error_row() {
    let console = TestConsole::new();

    let response = console.post_form("/", "query=not+a+real+query").await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.contains("<div class=\"error\">"));
    assert!(response.body.contains("query error:"));
    assert!(!response.body.contains("<table>"));
}

#[tokio::test]
async fn successful_query_renders_rows_in_column_order() {
    let console = TestConsole::with_query_rows(vec![
        json!({"name": "Ada", "email": "ada@example.com"}),
        json!({"name": "Alan", "error": "none"}),
    ]);

    let response = console
        .post_form("/", "query=SELECT+name%2C+email+FROM+console.users")
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(!response.body.contains("<div class=\"error\">"));
    assert!(response.body.contains("<th>name</th><th>email</th><th>error</th>"));
    assert!(response.body.contains(">ada@example.com</td>"));
    assert!(response.body.contains(">none</td>"));
    assert!(response.body.contains("2 row(s)"));
}

#[tokio::test]
async fn blank_query_runs_nothing() {
    let console = TestConsole::new();

    let response = console.post_form("/", "query=++").await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(!response.body.contains("<div class=\"error\">"));
    assert!(response.body.contains("No rows."));
}

#[tokio::test]
async fn disabled_console_refuses_queries() {
    let console = TestConsole::with_raw_query(RawQueryConfig {
        enabled: false,
        timeout: None,
    });

    let page = console.get("/").await;
    assert_eq!(page.status, StatusCode::OK);
    assert!(page.body.contains("disabled"));
    assert!(!page.body.contains("<textarea"));

    let response = console.post_form("/", "query=SELECT+1").await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn health_endpoints() {
    let console = TestConsole::new();

    let live = console.get("/health").await;
    assert_eq!(live.status, StatusCode::OK);
    assert_eq!(live.body, "ok");

    assert_eq!(console.get("/health/ready").await.status, StatusCode::OK);
}
