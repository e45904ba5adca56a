//! Page/limit pagination primitives shared by RBAC API list endpoints.
//!
//! List endpoints accept `page` and `limit` query parameters encoded as
//! strings and respond with a `{ data, meta }` envelope. This crate owns the
//! parsing rules for those parameters and the arithmetic behind the envelope
//! metadata, so adapters never compute offsets or page counts by hand.
//!
//! # Examples
//!
//! ```
//! use pagination::{PageRequest, Paginated};
//!
//! let request = PageRequest::parse(Some("2"), Some("3")).expect("valid page");
//! assert_eq!(request.offset(), 3);
//!
//! let page = Paginated::new(vec!["d", "e", "f"], request, 7);
//! assert_eq!(page.meta().total_pages(), 3);
//! ```

mod envelope;
mod request;

pub use envelope::{PageMeta, Paginated};
pub use request::{DEFAULT_LIMIT, DEFAULT_PAGE, PageRequest, PageRequestError, parse_limit};
