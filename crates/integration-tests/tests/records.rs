//! Record list and CRUD routes over the in-memory store.

#![allow(clippy::expect_used, clippy::indexing_slicing, clippy::unwrap_used)]

use axum::http::StatusCode;

use record_console_admin::db::DocumentStore;
use record_console_core::CollectionKind;
use record_console_integration_tests::TestConsole;

fn edit_links(body: &str, collection: &str) -> usize {
    body.matches(&format!("href=\"/update/{collection}/")).count()
}

#[tokio::test]
async fn seeded_products_first_page_has_ten_rows_of_ten_pages() {
    let console = TestConsole::seeded(100).await;

    let response = console.get("/products?page=1&per_page=10").await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(edit_links(&response.body, "products"), 10);
    assert!(response.body.contains("Page 1 of 10"));
    // askama escapes `&` in the href, so check the two parameters separately
    let next = response
        .body
        .split("href=\"/products?")
        .nth(1)
        .and_then(|rest| rest.split('"').next())
        .unwrap();
    assert!(next.starts_with("page=2"));
    assert!(next.ends_with("per_page=10"));
}

#[tokio::test]
async fn list_defaults_to_first_page_of_ten() {
    let console = TestConsole::seeded(25).await;

    let response = console.get("/users").await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(edit_links(&response.body, "users"), 10);
    assert!(response.body.contains("Page 1 of 3"));
}

#[tokio::test]
async fn last_partial_page_and_past_the_end() {
    let console = TestConsole::seeded(25).await;

    let response = console.get("/orders?page=3&per_page=10").await;
    assert_eq!(edit_links(&response.body, "orders"), 5);
    assert!(!response.body.contains("Next"));

    let response = console.get("/orders?page=4&per_page=10").await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(edit_links(&response.body, "orders"), 0);
    assert!(response.body.contains("No records."));
}

#[tokio::test]
async fn invalid_pagination_is_bad_request() {
    let console = TestConsole::new();

    for uri in [
        "/users?page=0",
        "/users?page=-1",
        "/users?per_page=0",
        "/users?per_page=101",
        "/users?page=abc",
    ] {
        let response = console.get(uri).await;
        assert_eq!(response.status, StatusCode::BAD_REQUEST, "{uri}");
    }
}

#[tokio::test]
async fn unknown_collection_is_not_found() {
    let console = TestConsole::new();

    assert_eq!(console.get("/widgets").await.status, StatusCode::NOT_FOUND);
    assert_eq!(
        console.get("/create/widgets").await.status,
        StatusCode::NOT_FOUND
    );
    let response = console.post_form("/delete/widgets/w1", "").await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert!(response.body.contains("Unknown collection: widgets"));
}

#[tokio::test]
async fn create_stores_record_and_redirects_to_list() {
    let console = TestConsole::new();

    let response = console
        .post_form("/create/users", "key=u1&name=Ada&email=ada%40example.com")
        .await;
    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(response.location.as_deref(), Some("/users"));

    let document = console.store.get(CollectionKind::Users, "u1").await.unwrap();
    assert_eq!(document.get("name").unwrap(), "Ada");
    assert_eq!(document.get("email").unwrap(), "ada@example.com");

    let list = console.get("/users").await;
    assert!(list.body.contains("ada@example.com"));
}

#[tokio::test]
async fn create_without_key_generates_one() {
    let console = TestConsole::new();

    let response = console.post_form("/create/categories", "key=&name=Tools").await;
    assert_eq!(response.status, StatusCode::SEE_OTHER);

    let documents = console
        .store
        .list(CollectionKind::Categories, 10, 0)
        .await
        .unwrap();
    assert_eq!(documents.len(), 1);
    let key = documents[0].get("key").and_then(|v| v.as_str()).unwrap();
    assert!(uuid::Uuid::parse_str(key).is_ok());
    assert_eq!(documents[0].get("name").unwrap(), "Tools");
}

#[tokio::test]
async fn create_trims_key_and_list_links_resolve() {
    let console = TestConsole::new();

    let response = console.post_form("/create/users", "key=+u1+&name=Ada").await;
    assert_eq!(response.status, StatusCode::SEE_OTHER);

    let document = console.store.get(CollectionKind::Users, "u1").await.unwrap();
    assert_eq!(document.get("key").unwrap(), "u1");

    let list = console.get("/users").await;
    assert!(list.body.contains("href=\"/update/users/u1\""));
    assert_eq!(console.get("/update/users/u1").await.status, StatusCode::OK);
    assert_eq!(console.get("/delete/users/u1").await.status, StatusCode::OK);
}

#[tokio::test]
async fn create_form_lists_collection_fields() {
    let console = TestConsole::new();

    let response = console.get("/create/order_items").await;
    assert_eq!(response.status, StatusCode::OK);
    for field in ["key", "order_id", "product_id", "quantity"] {
        assert!(response.body.contains(&format!("name=\"{field}\"")), "{field}");
    }
}

#[tokio::test]
async fn update_replaces_record_at_path_key() {
    let console = TestConsole::new();
    console
        .post_form("/create/products", "key=p1&name=Lamp&price=10.00&category_id=c1")
        .await;

    let form = console.get("/update/products/p1").await;
    assert_eq!(form.status, StatusCode::OK);
    assert!(form.body.contains("value=\"Lamp\""));

    let response = console
        .post_form("/update/products/p1", "key=other&name=Desk+Lamp&price=12.50")
        .await;
    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(response.location.as_deref(), Some("/products"));

    let document = console
        .store
        .get(CollectionKind::Products, "p1")
        .await
        .unwrap();
    assert_eq!(document.get("key").unwrap(), "p1");
    assert_eq!(document.get("name").unwrap(), "Desk Lamp");
    assert_eq!(document.get("price").unwrap(), "12.50");
    // Full replace: fields left out of the form are gone
    assert!(document.get("category_id").is_none());
    assert!(
        console
            .store
            .get(CollectionKind::Products, "other")
            .await
            .is_err()
    );
}

#[tokio::test]
async fn edit_form_for_missing_record_is_not_found() {
    let console = TestConsole::new();

    let response = console.get("/update/users/nobody").await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert!(response.body.starts_with("Error fetching record:"));
}

#[tokio::test]
async fn delete_missing_record_is_an_error() {
    let console = TestConsole::new();

    let response = console.post_form("/delete/users/missing-key", "").await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert!(response.body.starts_with("Error deleting record:"));
}

#[tokio::test]
async fn delete_confirms_then_removes() {
    let console = TestConsole::new();
    console.post_form("/create/users", "key=u1&name=Ada").await;

    let confirm = console.get("/delete/users/u1").await;
    assert_eq!(confirm.status, StatusCode::OK);
    assert!(confirm.body.contains("action=\"/delete/users/u1\""));

    let response = console.post_form("/delete/users/u1", "").await;
    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(response.location.as_deref(), Some("/users"));

    assert!(
        console
            .store
            .get(CollectionKind::Users, "u1")
            .await
            .unwrap_err()
            .is_not_found()
    );
    assert_eq!(
        console.get("/update/users/u1").await.status,
        StatusCode::NOT_FOUND
    );
}

#[tokio::test]
async fn delete_does_not_cascade() {
    let console = TestConsole::new();
    console.post_form("/create/users", "key=u1&name=Ada").await;
    console
        .post_form("/create/orders", "key=o1&user_id=u1&order_date=2026-01-01")
        .await;

    console.post_form("/delete/users/u1", "").await;

    let order = console.store.get(CollectionKind::Orders, "o1").await.unwrap();
    assert_eq!(order.get("user_id").unwrap(), "u1");
}

#[tokio::test]
async fn keys_with_reserved_characters_round_trip() {
    let console = TestConsole::new();
    console
        .post_form("/create/categories", "key=a+b%2Fc&name=Odd")
        .await;

    let list = console.get("/categories").await;
    assert!(list.body.contains("href=\"/update/categories/a%20b%2Fc\""));

    let form = console.get("/update/categories/a%20b%2Fc").await;
    assert_eq!(form.status, StatusCode::OK);
    assert!(form.body.contains("value=\"Odd\""));
}
