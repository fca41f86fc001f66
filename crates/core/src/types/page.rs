//! Page-offset pagination.
//!
//! A list request is validated into a [`PageRequest`] before any store call,
//! so offsets and limits are always well-defined.

use serde::Serialize;
use thiserror::Error;

/// Page number used when the request does not specify one.
pub const DEFAULT_PAGE: i64 = 1;

/// Page size used when the request does not specify one.
pub const DEFAULT_PER_PAGE: i64 = 10;

/// Largest page size a request may ask for.
pub const MAX_PER_PAGE: i64 = 100;

/// Errors for invalid pagination parameters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PaginationError {
    #[error("page must be at least 1 (got {0})")]
    InvalidPage(i64),
    #[error("per_page must be between 1 and {MAX_PER_PAGE} (got {0})")]
    InvalidPerPage(i64),
}

/// A validated page request. `page` is 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageRequest {
    page: u32,
    per_page: u32,
}

impl PageRequest {
    /// Validate raw page parameters.
    ///
    /// # Errors
    ///
    /// Returns `PaginationError` if `page < 1` or `per_page` is outside
    /// `1..=MAX_PER_PAGE`.
    pub fn new(page: i64, per_page: i64) -> Result<Self, PaginationError> {
        let page = u32::try_from(page)
            .ok()
            .filter(|p| *p >= 1)
            .ok_or(PaginationError::InvalidPage(page))?;
        if !(1..=MAX_PER_PAGE).contains(&per_page) {
            return Err(PaginationError::InvalidPerPage(per_page));
        }
        let per_page =
            u32::try_from(per_page).map_err(|_| PaginationError::InvalidPerPage(per_page))?;
        Ok(Self { page, per_page })
    }

    /// Build a request from optional parameters, applying the defaults.
    ///
    /// # Errors
    ///
    /// Returns `PaginationError` if a supplied value is out of range.
    pub fn from_params(page: Option<i64>, per_page: Option<i64>) -> Result<Self, PaginationError> {
        Self::new(
            page.unwrap_or(DEFAULT_PAGE),
            per_page.unwrap_or(DEFAULT_PER_PAGE),
        )
    }

    #[must_use]
    pub const fn page(&self) -> u32 {
        self.page
    }

    #[must_use]
    pub const fn per_page(&self) -> u32 {
        self.per_page
    }

    /// Number of records to skip: `(page - 1) * per_page`.
    #[must_use]
    pub const fn offset(&self) -> u64 {
        (self.page as u64 - 1) * self.per_page as u64
    }

    /// Number of records to fetch.
    #[must_use]
    pub const fn limit(&self) -> u64 {
        self.per_page as u64
    }

    /// Total page count for a collection of `total` records.
    #[must_use]
    pub const fn total_pages(&self, total: u64) -> u64 {
        total.div_ceil(self.per_page as u64)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 1,
            per_page: 10,
        }
    }
}

/// One page of results plus the totals needed to render pagination links.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub request: PageRequest,
    pub total_items: u64,
    pub total_pages: u64,
}

impl<T> Page<T> {
    /// Assemble a page, computing `total_pages` from `total_items`.
    #[must_use]
    pub fn new(items: Vec<T>, request: PageRequest, total_items: u64) -> Self {
        let total_pages = request.total_pages(total_items);
        Self {
            items,
            request,
            total_items,
            total_pages,
        }
    }

    #[must_use]
    pub const fn has_previous(&self) -> bool {
        self.request.page() > 1
    }

    #[must_use]
    pub const fn has_next(&self) -> bool {
        (self.request.page() as u64) < self.total_pages
    }
}
