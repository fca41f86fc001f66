//! Sample data generation.
//!
//! Clears every collection and refills it with synthetic records whose
//! foreign-key fields point at randomly chosen records of the referenced
//! collection. Keys are fresh UUIDs on every run, so re-seeding is
//! idempotent in counts but not in identity.
//!
//! Failures never abort a run: a failed clear or upsert is logged, recorded
//! in the [`SeedReport`], and seeding moves on. Nothing is rolled back.

use chrono::{Datelike, Duration, NaiveDate, Utc};
use rand::Rng;
use rand::seq::IndexedRandom;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde_json::{Value as JsonValue, json};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use record_console_core::{CollectionKind, Document};

use crate::db::DocumentStore;

/// Records generated per collection unless configured otherwise.
pub const DEFAULT_SEED_COUNT: usize = 100;

const FIRST_NAMES: &[&str] = &[
    "Ada", "Grace", "Alan", "Edsger", "Barbara", "Donald", "Frances", "Ken", "Radia", "Dennis",
    "Margaret", "John", "Hedy", "Niklaus", "Katherine", "Tim", "Annie", "Linus", "Shafi", "Leslie",
];

const LAST_NAMES: &[&str] = &[
    "Lovelace", "Hopper", "Turing", "Dijkstra", "Liskov", "Knuth", "Allen", "Thompson", "Perlman",
    "Ritchie", "Hamilton", "Backus", "Lamarr", "Wirth", "Johnson", "Berners", "Easley", "Torvalds",
    "Goldwasser", "Lamport",
];

const WORDS: &[&str] = &[
    "anchor", "basket", "candle", "dynamo", "ember", "falcon", "garnet", "harbor", "island",
    "juniper", "kettle", "lantern", "meadow", "nickel", "orchid", "pepper", "quartz", "ribbon",
    "saddle", "timber", "umber", "velvet", "walnut", "yonder", "zephyr",
];

/// Outcome of a seeding run.
#[derive(Debug, Default)]
pub struct SeedReport {
    /// Documents written per collection, in seeding order.
    pub inserted: Vec<(CollectionKind, u64)>,
    /// Documents removed by the initial clear, per collection.
    pub cleared: Vec<(CollectionKind, u64)>,
    /// Failures encountered (collection, error message).
    pub errors: Vec<(CollectionKind, String)>,
}

impl SeedReport {
    /// Documents written to `kind`.
    #[must_use]
    pub fn inserted_for(&self, kind: CollectionKind) -> u64 {
        self.inserted
            .iter()
            .find(|(k, _)| *k == kind)
            .map_or(0, |(_, n)| *n)
    }
}

/// Generated documents for every collection, keyed and cross-referenced.
#[derive(Debug, Default)]
pub struct SampleData {
    pub users: Vec<Document>,
    pub categories: Vec<Document>,
    pub products: Vec<Document>,
    pub orders: Vec<Document>,
    pub order_items: Vec<Document>,
}

impl SampleData {
    /// Generate `count` documents per collection.
    #[must_use]
    pub fn generate<R: Rng + ?Sized>(count: usize, rng: &mut R) -> Self {
        let users: Vec<Document> = (0..count).map(|n| user(rng, n)).collect();
        let categories: Vec<Document> = (0..count).map(|_| category(rng)).collect();
        let products: Vec<Document> = (0..count)
            .map(|_| {
                let category_id = pick_key(&categories, rng);
                product(rng, category_id)
            })
            .collect();
        let orders: Vec<Document> = (0..count)
            .map(|_| {
                let user_id = pick_key(&users, rng);
                order(rng, user_id)
            })
            .collect();
        let order_items: Vec<Document> = (0..count)
            .map(|_| {
                let order_id = pick_key(&orders, rng);
                let product_id = pick_key(&products, rng);
                order_item(rng, order_id, product_id)
            })
            .collect();

        Self {
            users,
            categories,
            products,
            orders,
            order_items,
        }
    }

    /// Documents of one collection.
    #[must_use]
    pub fn documents(&self, kind: CollectionKind) -> &[Document] {
        match kind {
            CollectionKind::Users => &self.users,
            CollectionKind::Categories => &self.categories,
            CollectionKind::Products => &self.products,
            CollectionKind::Orders => &self.orders,
            CollectionKind::OrderItems => &self.order_items,
        }
    }
}

/// Clear all collections and write `count` fresh records to each.
#[instrument(skip(store))]
pub async fn seed_sample_data(store: &dyn DocumentStore, count: usize) -> SeedReport {
    let mut report = SeedReport::default();

    for kind in CollectionKind::ALL {
        match store.clear(kind).await {
            Ok(removed) => report.cleared.push((kind, removed)),
            Err(e) => {
                warn!(collection = %kind, error = %e, "Failed to clear collection");
                report.errors.push((kind, format!("clear: {e}")));
            }
        }
    }

    // ThreadRng is not Send, so every document is generated before the first await.
    let data = SampleData::generate(count, &mut rand::rng());

    for kind in CollectionKind::ALL {
        let mut inserted = 0;
        for doc in data.documents(kind) {
            let key = document_key(doc);
            match store.upsert(kind, key, doc).await {
                Ok(()) => inserted += 1,
                Err(e) => {
                    warn!(collection = %kind, key, error = %e, "Failed to seed document");
                    report.errors.push((kind, format!("upsert {key}: {e}")));
                }
            }
        }
        info!(collection = %kind, inserted, "Seeded collection");
        report.inserted.push((kind, inserted));
    }

    info!(errors = report.errors.len(), "Seeding complete");
    report
}

fn document_key(doc: &Document) -> &str {
    doc.get("key").and_then(JsonValue::as_str).unwrap_or_default()
}

/// Key of a random document, or empty when there is nothing to reference.
fn pick_key<R: Rng + ?Sized>(docs: &[Document], rng: &mut R) -> String {
    docs.choose(rng)
        .map(|doc| document_key(doc).to_string())
        .unwrap_or_default()
}

fn pick<R: Rng + ?Sized>(words: &[&'static str], rng: &mut R) -> &'static str {
    words.choose(rng).copied().unwrap_or("item")
}

fn new_key() -> String {
    Uuid::new_v4().to_string()
}

fn into_document(value: JsonValue) -> Document {
    match value {
        JsonValue::Object(map) => map,
        _ => Document::new(),
    }
}

fn user<R: Rng + ?Sized>(rng: &mut R, n: usize) -> Document {
    let first = pick(FIRST_NAMES, rng);
    let last = pick(LAST_NAMES, rng);
    into_document(json!({
        "key": new_key(),
        "name": format!("{first} {last}"),
        "email": format!("{}.{}{n}@example.com", first.to_lowercase(), last.to_lowercase()),
    }))
}

fn category<R: Rng + ?Sized>(rng: &mut R) -> Document {
    into_document(json!({
        "key": new_key(),
        "name": pick(WORDS, rng),
    }))
}

fn product<R: Rng + ?Sized>(rng: &mut R, category_id: String) -> Document {
    into_document(json!({
        "key": new_key(),
        "name": pick(WORDS, rng),
        "price": random_price(rng),
        "category_id": category_id,
    }))
}

fn order<R: Rng + ?Sized>(rng: &mut R, user_id: String) -> Document {
    into_document(json!({
        "key": new_key(),
        "user_id": user_id,
        "order_date": random_date_this_decade(rng).to_string(),
    }))
}

fn order_item<R: Rng + ?Sized>(rng: &mut R, order_id: String, product_id: String) -> Document {
    into_document(json!({
        "key": new_key(),
        "order_id": order_id,
        "product_id": product_id,
        "quantity": rng.random_range(1..=10),
    }))
}

/// Price in [10.00, 1000.00] with two decimal places.
fn random_price<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    let cents: i64 = rng.random_range(1_000..=100_000);
    Decimal::new(cents, 2).to_f64().unwrap_or(10.0)
}

/// A date between January 1st of the current decade and today.
fn random_date_this_decade<R: Rng + ?Sized>(rng: &mut R) -> NaiveDate {
    let today = Utc::now().date_naive();
    let decade_start = NaiveDate::from_ymd_opt(today.year() - today.year().rem_euclid(10), 1, 1)
        .unwrap_or(today);
    let span = (today - decade_start).num_days();
    decade_start + Duration::days(rng.random_range(0..=span))
}
