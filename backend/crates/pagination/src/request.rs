//! Page request parsing and validation.

use serde::{Deserialize, Serialize};

/// Page number used when the client omits `page`.
pub const DEFAULT_PAGE: u32 = 1;

/// Page size used when the client omits `limit`.
pub const DEFAULT_LIMIT: u32 = 10;

/// Errors raised while validating page parameters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PageRequestError {
    /// The page number was not a positive integer.
    #[error("page must be a positive integer, got {value:?}")]
    InvalidPage {
        /// Raw value supplied by the caller.
        value: String,
    },
    /// The page size was not a positive integer.
    #[error("limit must be a positive integer, got {value:?}")]
    InvalidLimit {
        /// Raw value supplied by the caller.
        value: String,
    },
}

/// Validated page selection.
///
/// ## Invariants
/// - `page >= 1`
/// - `limit >= 1`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PageRequest {
    page: u32,
    limit: u32,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
        }
    }
}

fn parse_positive(raw: Option<&str>, default: u32) -> Option<u32> {
    raw.map_or(Some(default), |text| {
        text.trim().parse::<u32>().ok().filter(|value| *value > 0)
    })
}

/// Parse a standalone `limit` parameter, falling back to `default` when absent.
///
/// # Errors
/// Returns [`PageRequestError::InvalidLimit`] when the value is present but is
/// not a positive integer.
///
/// # Examples
/// ```
/// use pagination::parse_limit;
///
/// assert_eq!(parse_limit(None, 12), Ok(12));
/// assert_eq!(parse_limit(Some("2"), 12), Ok(2));
/// assert!(parse_limit(Some("0"), 12).is_err());
/// ```
pub fn parse_limit(raw: Option<&str>, default: u32) -> Result<u32, PageRequestError> {
    parse_positive(raw, default).ok_or_else(|| PageRequestError::InvalidLimit {
        value: raw.unwrap_or_default().to_owned(),
    })
}

impl PageRequest {
    /// Build a page request from already-numeric values.
    ///
    /// # Errors
    /// Returns [`PageRequestError`] when either value is zero.
    pub fn new(page: u32, limit: u32) -> Result<Self, PageRequestError> {
        if page == 0 {
            return Err(PageRequestError::InvalidPage {
                value: page.to_string(),
            });
        }
        if limit == 0 {
            return Err(PageRequestError::InvalidLimit {
                value: limit.to_string(),
            });
        }
        Ok(Self { page, limit })
    }

    /// Parse string-encoded `page` and `limit` query parameters.
    ///
    /// Missing values fall back to [`DEFAULT_PAGE`] and [`DEFAULT_LIMIT`].
    ///
    /// # Errors
    /// Returns [`PageRequestError`] when a value is present but is not a
    /// positive integer.
    ///
    /// # Examples
    /// ```
    /// use pagination::PageRequest;
    ///
    /// let request = PageRequest::parse(None, None).expect("defaults are valid");
    /// assert_eq!((request.page(), request.limit()), (1, 10));
    /// ```
    pub fn parse(page: Option<&str>, limit: Option<&str>) -> Result<Self, PageRequestError> {
        let parsed_page =
            parse_positive(page, DEFAULT_PAGE).ok_or_else(|| PageRequestError::InvalidPage {
                value: page.unwrap_or_default().to_owned(),
            })?;
        let parsed_limit = parse_limit(limit, DEFAULT_LIMIT)?;
        Ok(Self {
            page: parsed_page,
            limit: parsed_limit,
        })
    }

    /// One-based page number.
    #[must_use]
    pub const fn page(&self) -> u32 {
        self.page
    }

    /// Maximum number of items on the page.
    #[must_use]
    pub const fn limit(&self) -> u32 {
        self.limit
    }

    /// Number of rows to skip: `(page - 1) * limit`.
    #[must_use]
    pub const fn offset(&self) -> u64 {
        (self.page.saturating_sub(1) as u64).saturating_mul(self.limit as u64)
    }
}
