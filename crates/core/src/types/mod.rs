//! Core types for Record Console.
//!
//! This module provides the domain vocabulary shared by the server and the CLI.

pub mod collection;
pub mod document;
pub mod page;

pub use collection::{CollectionKind, UnknownCollection};
pub use document::{Document, display_value, document_from_fields, field_display};
pub use page::{DEFAULT_PAGE, DEFAULT_PER_PAGE, MAX_PER_PAGE, Page, PageRequest, PaginationError};
