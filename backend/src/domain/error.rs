//! Transport-agnostic failures returned by the domain services.
//!
//! Every error carries a stable [`ErrorCode`], a human message and, when it
//! was raised inside a request, that request's trace id. Validation failures
//! add `details` naming the offending field:
//!
//! ```json
//! { "field": "roleId", "code": "unknown_role", "value": 7 }
//! ```

use std::fmt;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::domain::TraceId;

const STORAGE_UNAVAILABLE: &str = "Database temporarily unavailable";

/// Failure category. Inbound adapters map each one to a status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[non_exhaustive]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    InvalidRequest,
    Unauthorized,
    Forbidden,
    NotFound,
    /// Duplicate names, emails in use, roles still assigned to users.
    Conflict,
    /// The database could not be reached.
    ServiceUnavailable,
    InternalError,
}

impl ErrorCode {
    const fn fallback_message(self) -> &'static str {
        match self {
            Self::InvalidRequest => "Invalid request",
            Self::Unauthorized => "Unauthorized",
            Self::Forbidden => "Forbidden",
            Self::NotFound => "Not found",
            Self::Conflict => "Conflict",
            Self::ServiceUnavailable => "Service unavailable",
            Self::InternalError => "Internal server error",
        }
    }
}

/// Domain error payload.
///
/// `message` is never blank: constructors substitute the code's generic
/// message. Serialises as `{code, message, traceId?, details?}`.
///
/// # Examples
/// ```
/// use rbac_api::domain::{Error, ErrorCode};
///
/// let err = Error::invalid_field("Role 7 does not exist", "roleId", "unknown_role", 7);
/// assert_eq!(err.code(), ErrorCode::InvalidRequest);
/// assert_eq!(err.details().and_then(|d| d.get("field")), Some(&"roleId".into()));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Error {
    code: ErrorCode,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    trace_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<Value>,
}

impl Error {
    /// Build an error stamped with the ambient trace id.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        let message = message.into();
        let message = if message.trim().is_empty() {
            code.fallback_message().to_owned()
        } else {
            message
        };
        Self {
            code,
            message,
            trace_id: TraceId::current().map(|id| id.to_string()),
            details: None,
        }
    }

    /// An `invalid_request` naming the field at fault.
    ///
    /// `reason` is a snake_case code such as `invalid_email`.
    pub fn invalid_field(
        message: impl Into<String>,
        field: &str,
        reason: &str,
        value: impl Into<Value>,
    ) -> Self {
        let mut details = Map::new();
        details.insert("field".to_owned(), field.into());
        details.insert("code".to_owned(), reason.into());
        let value = value.into();
        if !value.is_null() {
            details.insert("value".to_owned(), value);
        }
        Self::invalid_request(message).with_details(Value::Object(details))
    }

    pub fn code(&self) -> ErrorCode {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn trace_id(&self) -> Option<&str> {
        self.trace_id.as_deref()
    }

    pub fn details(&self) -> Option<&Value> {
        self.details.as_ref()
    }

    /// Attach a trace id explicitly. Blank ids are ignored.
    pub fn with_trace_id(mut self, id: impl Into<String>) -> Self {
        let id = id.into();
        if !id.trim().is_empty() {
            self.trace_id = Some(id);
        }
        self
    }

    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidRequest, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Unauthorized, message)
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Forbidden, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::NotFound, message)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Conflict, message)
    }

    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ServiceUnavailable, message)
    }

    /// The database could not be reached. The driver's reason is logged by
    /// the adapter and never sent to clients.
    pub fn storage_unavailable() -> Self {
        Self::service_unavailable(STORAGE_UNAVAILABLE)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for Error {}

#[cfg(test)]
mod tests;
