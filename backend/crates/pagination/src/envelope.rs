//! Response envelope for paginated listings.

use serde::Serialize;

use crate::PageRequest;

/// Metadata describing one page of a listing.
///
/// Serialises as `{ "total", "page", "limit", "totalPages" }`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    total: u64,
    page: u32,
    limit: u32,
    total_pages: u64,
}

impl PageMeta {
    /// Derive page metadata for `total` matching rows.
    ///
    /// `total_pages` is `ceil(total / limit)`, so an empty listing reports
    /// zero pages.
    ///
    /// # Examples
    /// ```
    /// use pagination::{PageMeta, PageRequest};
    ///
    /// let request = PageRequest::new(1, 10).expect("valid request");
    /// assert_eq!(PageMeta::new(request, 21).total_pages(), 3);
    /// ```
    #[must_use]
    pub const fn new(request: PageRequest, total: u64) -> Self {
        let limit = request.limit();
        Self {
            total,
            page: request.page(),
            limit,
            total_pages: total.div_ceil(limit as u64),
        }
    }

    /// Total rows across all pages.
    #[must_use]
    pub const fn total(&self) -> u64 {
        self.total
    }

    /// One-based page number.
    #[must_use]
    pub const fn page(&self) -> u32 {
        self.page
    }

    /// Requested page size.
    #[must_use]
    pub const fn limit(&self) -> u32 {
        self.limit
    }

    /// Number of pages needed to cover `total`.
    #[must_use]
    pub const fn total_pages(&self) -> u64 {
        self.total_pages
    }
}

/// A page of items together with its metadata.
///
/// ## Invariants
/// - `data.len() <= meta.limit()`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Paginated<T> {
    data: Vec<T>,
    meta: PageMeta,
}

impl<T> Paginated<T> {
    /// Wrap `data` for the given request.
    ///
    /// Items beyond the requested limit are dropped.
    #[must_use]
    pub fn new(mut data: Vec<T>, request: PageRequest, total: u64) -> Self {
        let cap = usize::try_from(request.limit()).unwrap_or(usize::MAX);
        data.truncate(cap);
        Self {
            data,
            meta: PageMeta::new(request, total),
        }
    }

    /// Items on this page.
    #[must_use]
    pub fn data(&self) -> &[T] {
        &self.data
    }

    /// Page metadata.
    #[must_use]
    pub const fn meta(&self) -> &PageMeta {
        &self.meta
    }

    /// Transform each item while keeping the metadata.
    #[must_use]
    pub fn map<U, F>(self, f: F) -> Paginated<U>
    where
        F: FnMut(T) -> U,
    {
        Paginated {
            data: self.data.into_iter().map(f).collect(),
            meta: self.meta,
        }
    }

    /// Split into items and metadata.
    #[must_use]
    pub fn into_parts(self) -> (Vec<T>, PageMeta) {
        (self.data, self.meta)
    }
}
