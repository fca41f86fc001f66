//! Record list and CRUD route handlers.
//!
//! One set of handlers serves every collection; the `{collection}` path
//! segment is resolved to a [`CollectionKind`] before any store call.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, Query, State},
    response::Redirect,
};
use serde::Deserialize;
use tracing::instrument;

use record_console_core::{
    CollectionKind, Document, PageRequest, document_from_fields, field_display,
};

use crate::{
    error::{AppError, RecordAction},
    filters,
    state::AppState,
};

use super::{NavLink, nav_links, parse_collection};

/// Field every record carries.
const KEY_FIELD: &str = "key";

/// List query parameters, kept as strings so junk input is a 400, not a rejection page.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub page: Option<String>,
    pub per_page: Option<String>,
}

impl ListQuery {
    /// Parse into a validated page request.
    ///
    /// # Errors
    ///
    /// Returns `AppError::BadRequest` for non-numeric values and
    /// `AppError::Pagination` for out-of-range ones.
    pub fn page_request(&self) -> Result<PageRequest, AppError> {
        let page = parse_param("page", self.page.as_deref())?;
        let per_page = parse_param("per_page", self.per_page.as_deref())?;
        Ok(PageRequest::from_params(page, per_page)?)
    }
}

fn parse_param(name: &str, raw: Option<&str>) -> Result<Option<i64>, AppError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => value
            .parse()
            .map(Some)
            .map_err(|_| AppError::BadRequest(format!("{name} must be an integer (got {value:?})"))),
    }
}

/// One row of the list table.
#[derive(Debug, Clone)]
pub struct RecordRow {
    pub key: String,
    /// `key` encoded for use in edit and delete links.
    pub segment: String,
    pub cells: Vec<String>,
}

impl RecordRow {
    fn new(kind: CollectionKind, document: &Document) -> Self {
        let key = field_display(document, KEY_FIELD);
        Self {
            segment: encode_segment(&key),
            key,
            cells: kind
                .fields()
                .iter()
                .map(|field| field_display(document, field))
                .collect(),
        }
    }
}

/// One input of a record form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormField {
    pub name: String,
    pub value: String,
}

/// Form inputs for a record: the collection's known fields first, then any
/// extra fields the stored document carries.
fn form_fields(kind: CollectionKind, document: Option<&Document>) -> Vec<FormField> {
    let known = kind.fields();
    let mut fields: Vec<FormField> = known
        .iter()
        .map(|name| FormField {
            name: (*name).to_string(),
            value: document.map(|d| field_display(d, name)).unwrap_or_default(),
        })
        .collect();

    if let Some(document) = document {
        fields.extend(
            document
                .keys()
                .filter(|name| !known.contains(&name.as_str()))
                .map(|name| FormField {
                    name: name.clone(),
                    value: field_display(document, name),
                }),
        );
    }
    fields
}

/// Paginated list page template.
#[derive(Template, WebTemplate)]
#[template(path = "records/index.html")]
pub struct RecordsIndexTemplate {
    pub nav: Vec<NavLink>,
    pub collection: &'static str,
    pub title: &'static str,
    pub singular: &'static str,
    pub columns: &'static [&'static str],
    pub rows: Vec<RecordRow>,
    pub page: u32,
    pub per_page: u32,
    pub total_items: u64,
    pub total_pages: u64,
    pub prev_url: Option<String>,
    pub next_url: Option<String>,
    pub error: Option<String>,
}

/// Create and edit form template.
#[derive(Template, WebTemplate)]
#[template(path = "records/form.html")]
pub struct RecordFormTemplate {
    pub nav: Vec<NavLink>,
    pub collection: &'static str,
    pub title: String,
    pub action: String,
    pub list_url: String,
    pub fields: Vec<FormField>,
    /// Key of the record being edited; `None` on the create form.
    pub key: Option<String>,
}

/// Delete confirmation template.
#[derive(Template, WebTemplate)]
#[template(path = "records/delete.html")]
pub struct RecordDeleteTemplate {
    pub nav: Vec<NavLink>,
    pub collection: &'static str,
    pub singular: &'static str,
    pub key: String,
    pub fields: Vec<FormField>,
    pub action: String,
    pub list_url: String,
}

fn page_url(kind: CollectionKind, page: u32, per_page: u32) -> String {
    format!("{}?page={page}&per_page={per_page}", kind.list_path())
}

/// Collection list handler.
///
/// A store failure renders inside the page as an error banner.
#[instrument(skip(state, query))]
pub async fn index(
    State(state): State<AppState>,
    Path(collection): Path<String>,
    Query(query): Query<ListQuery>,
) -> Result<RecordsIndexTemplate, AppError> {
    let kind = parse_collection(&collection)?;
    let request = query.page_request()?;

    let mut template = RecordsIndexTemplate {
        nav: nav_links(Some(kind)),
        collection: kind.as_str(),
        title: kind.label(),
        singular: kind.singular(),
        columns: kind.fields(),
        rows: Vec::new(),
        page: request.page(),
        per_page: request.per_page(),
        total_items: 0,
        total_pages: 0,
        prev_url: None,
        next_url: None,
        error: None,
    };

    match state.gateway().list(kind, request).await {
        Ok(page) => {
            template.rows = page.items.iter().map(|d| RecordRow::new(kind, d)).collect();
            template.total_items = page.total_items;
            template.total_pages = page.total_pages;
            if page.has_previous() {
                template.prev_url = Some(page_url(kind, request.page() - 1, request.per_page()));
            }
            if page.has_next() {
                template.next_url = Some(page_url(kind, request.page() + 1, request.per_page()));
            }
        }
        Err(e) => {
            tracing::error!(collection = %kind, error = %e, "Failed to list records");
            template.error = Some(format!("Error fetching records: {e}"));
        }
    }

    Ok(template)
}

/// Empty create form.
#[instrument]
pub async fn create_form(Path(collection): Path<String>) -> Result<RecordFormTemplate, AppError> {
    let kind = parse_collection(&collection)?;
    Ok(RecordFormTemplate {
        nav: nav_links(Some(kind)),
        collection: kind.as_str(),
        title: format!("New {}", kind.singular()),
        action: format!("/create/{kind}"),
        list_url: kind.list_path(),
        fields: form_fields(kind, None),
        key: None,
    })
}

/// Create a record from the submitted fields.
///
/// Surrounding whitespace is trimmed from `key`, and a missing or blank `key`
/// is replaced with a fresh UUID. Either way the final key is written back to
/// the document's `key` field.
#[instrument(skip(state, fields))]
pub async fn create(
    State(state): State<AppState>,
    Path(collection): Path<String>,
    Form(fields): Form<Vec<(String, String)>>,
) -> Result<Redirect, AppError> {
    let kind = parse_collection(&collection)?;
    let mut document = document_from_fields(fields);

    let key = match document.get(KEY_FIELD).and_then(|v| v.as_str()).map(str::trim) {
        Some(key) if !key.is_empty() => key.to_string(),
        _ => uuid::Uuid::new_v4().to_string(),
    };
    // The stored field must match the store key so list links resolve.
    document.insert(KEY_FIELD.to_string(), key.clone().into());

    state
        .gateway()
        .upsert(kind, &key, &document)
        .await
        .map_err(|e| AppError::record(RecordAction::Creating, e))?;

    tracing::info!(collection = %kind, key = %key, "Record created");
    Ok(Redirect::to(&kind.list_path()))
}

/// Edit form with the record's current values.
#[instrument(skip(state))]
pub async fn edit_form(
    State(state): State<AppState>,
    Path((collection, key)): Path<(String, String)>,
) -> Result<RecordFormTemplate, AppError> {
    let kind = parse_collection(&collection)?;
    let document = state
        .gateway()
        .get(kind, &key)
        .await
        .map_err(|e| AppError::record(RecordAction::Fetching, e))?;

    Ok(RecordFormTemplate {
        nav: nav_links(Some(kind)),
        collection: kind.as_str(),
        title: format!("Edit {}", kind.singular()),
        action: format!("/update/{kind}/{}", encode_segment(&key)),
        list_url: kind.list_path(),
        fields: form_fields(kind, Some(&document)),
        key: Some(key),
    })
}

/// Replace the record at `key` with the submitted fields.
///
/// The path key wins over any `key` field in the form.
#[instrument(skip(state, fields))]
pub async fn update(
    State(state): State<AppState>,
    Path((collection, key)): Path<(String, String)>,
    Form(fields): Form<Vec<(String, String)>>,
) -> Result<Redirect, AppError> {
    let kind = parse_collection(&collection)?;
    let mut document = document_from_fields(fields);
    document.insert(KEY_FIELD.to_string(), key.clone().into());

    state
        .gateway()
        .upsert(kind, &key, &document)
        .await
        .map_err(|e| AppError::record(RecordAction::Updating, e))?;

    tracing::info!(collection = %kind, key = %key, "Record updated");
    Ok(Redirect::to(&kind.list_path()))
}

/// Delete confirmation page.
#[instrument(skip(state))]
pub async fn delete_confirm(
    State(state): State<AppState>,
    Path((collection, key)): Path<(String, String)>,
) -> Result<RecordDeleteTemplate, AppError> {
    let kind = parse_collection(&collection)?;
    let document = state
        .gateway()
        .get(kind, &key)
        .await
        .map_err(|e| AppError::record(RecordAction::Fetching, e))?;

    Ok(RecordDeleteTemplate {
        nav: nav_links(Some(kind)),
        collection: kind.as_str(),
        singular: kind.singular(),
        action: format!("/delete/{kind}/{}", encode_segment(&key)),
        list_url: kind.list_path(),
        fields: form_fields(kind, Some(&document)),
        key,
    })
}

/// Remove the record at `key`.
#[instrument(skip(state))]
pub async fn delete(
    State(state): State<AppState>,
    Path((collection, key)): Path<(String, String)>,
) -> Result<Redirect, AppError> {
    let kind = parse_collection(&collection)?;
    state
        .gateway()
        .delete(kind, &key)
        .await
        .map_err(|e| AppError::record(RecordAction::Deleting, e))?;

    tracing::info!(collection = %kind, key = %key, "Record deleted");
    Ok(Redirect::to(&kind.list_path()))
}

/// Percent-encode a key for use as a single path segment.
#[must_use]
pub fn encode_segment(key: &str) -> String {
    urlencoding::encode(key).into_owned()
}
