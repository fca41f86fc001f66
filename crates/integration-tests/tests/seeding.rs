//! Sample data seeding against the in-memory store.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use std::collections::HashSet;

use record_console_admin::db::DocumentStore;
use record_console_core::CollectionKind;
use record_console_integration_tests::TestConsole;

async fn keys(console: &TestConsole, kind: CollectionKind) -> HashSet<String> {
    console
        .store
        .list(kind, 1_000, 0)
        .await
        .unwrap()
        .iter()
        .filter_map(|d| d.get("key").and_then(|v| v.as_str()).map(String::from))
        .collect()
}

#[tokio::test]
async fn seeding_writes_count_records_per_collection() {
    let console = TestConsole::seeded(100).await;

    for kind in CollectionKind::ALL {
        assert_eq!(console.store.count(kind).await.unwrap(), 100, "{kind}");
    }
}

#[tokio::test]
async fn reseeding_keeps_counts_but_changes_keys() {
    let console = TestConsole::seeded(20).await;
    let before = keys(&console, CollectionKind::Users).await;

    let report =
        record_console_admin::seed::seed_sample_data(console.store.as_ref(), 20).await;
    assert!(report.errors.is_empty());
    assert_eq!(report.inserted_for(CollectionKind::Users), 20);

    let after = keys(&console, CollectionKind::Users).await;
    assert_eq!(after.len(), 20);
    assert!(before.is_disjoint(&after));
}

#[tokio::test]
async fn seeded_references_point_at_seeded_records() {
    let console = TestConsole::seeded(30).await;
    let users = keys(&console, CollectionKind::Users).await;
    let products = keys(&console, CollectionKind::Products).await;

    let orders = console
        .store
        .list(CollectionKind::Orders, 1_000, 0)
        .await
        .unwrap();
    for order in &orders {
        let user_id = order.get("user_id").and_then(|v| v.as_str()).unwrap();
        assert!(users.contains(user_id));
    }

    let items = console
        .store
        .list(CollectionKind::OrderItems, 1_000, 0)
        .await
        .unwrap();
    for item in &items {
        let product_id = item.get("product_id").and_then(|v| v.as_str()).unwrap();
        assert!(products.contains(product_id));
    }
}
