//! Shared validation helpers for inbound HTTP adapters.
//!
//! Every rejection is an `invalid_request` error whose `details` name the
//! offending field, a stable machine-readable code and, where useful, the
//! raw value.

use pagination::{PageRequest, PageRequestError, parse_limit};
use serde::{Deserialize, Deserializer};
use utoipa::IntoParams;

use crate::domain::{EmailAddress, Error, PermissionName, RoleName, SlackId};

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    InvalidId,
    InvalidPage,
    InvalidLimit,
    EmptyField,
    InvalidEmail,
    InvalidPermissionName,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            Self::InvalidId => "invalid_id",
            Self::InvalidPage => "invalid_page",
            Self::InvalidLimit => "invalid_limit",
            Self::EmptyField => "empty_field",
            Self::InvalidEmail => "invalid_email",
            Self::InvalidPermissionName => "invalid_permission_name",
        }
    }
}

/// Newtype wrapper for HTTP field names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    fn as_str(self) -> &'static str {
        self.0
    }
}

fn field_error(field: FieldName, code: ErrorCode, message: String, value: Option<&str>) -> Error {
    Error::invalid_field(message, field.as_str(), code.as_str(), value)
}

/// Parse a path id; it must be a positive 32-bit integer.
pub(crate) fn parse_id(raw: &str, field: FieldName) -> Result<i32, Error> {
    raw.trim()
        .parse::<i32>()
        .ok()
        .filter(|id| *id > 0)
        .ok_or_else(|| {
            field_error(
                field,
                ErrorCode::InvalidId,
                format!("{} must be a positive integer", field.as_str()),
                Some(raw),
            )
        })
}

fn map_page_error(err: PageRequestError) -> Error {
    let (field, code, value) = match &err {
        PageRequestError::InvalidPage { value } => ("page", ErrorCode::InvalidPage, value),
        PageRequestError::InvalidLimit { value } => ("limit", ErrorCode::InvalidLimit, value),
    };
    field_error(FieldName::new(field), code, err.to_string(), Some(value))
}

/// `page` / `limit` query parameters. Both arrive as strings.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PageQuery {
    /// One-based page number. Defaults to 1.
    #[param(example = "1")]
    pub page: Option<String>,
    /// Page size. Defaults to 10.
    #[param(example = "10")]
    pub limit: Option<String>,
}

impl PageQuery {
    pub(crate) fn into_page_request(self) -> Result<PageRequest, Error> {
        PageRequest::parse(self.page.as_deref(), self.limit.as_deref()).map_err(map_page_error)
    }
}

/// `limit` query parameter for history endpoints.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct LimitQuery {
    /// Maximum number of entries. Defaults to 12.
    #[param(example = "12")]
    pub limit: Option<String>,
}

impl LimitQuery {
    pub(crate) fn parse_or(self, default: u32) -> Result<u32, Error> {
        parse_limit(self.limit.as_deref(), default).map_err(map_page_error)
    }
}

pub(crate) fn parse_role_name(raw: String, field: FieldName) -> Result<RoleName, Error> {
    RoleName::new(raw).map_err(|_| {
        field_error(
            field,
            ErrorCode::EmptyField,
            format!("{} must not be empty", field.as_str()),
            None,
        )
    })
}

pub(crate) fn parse_slack_id(raw: String, field: FieldName) -> Result<SlackId, Error> {
    SlackId::new(raw).map_err(|_| {
        field_error(
            field,
            ErrorCode::EmptyField,
            format!("{} must not be empty", field.as_str()),
            None,
        )
    })
}

pub(crate) fn parse_email(raw: String, field: FieldName) -> Result<EmailAddress, Error> {
    EmailAddress::new(raw.clone()).map_err(|_| {
        field_error(
            field,
            ErrorCode::InvalidEmail,
            format!("{} must be a valid email address", field.as_str()),
            Some(&raw),
        )
    })
}

pub(crate) fn parse_permission_name(
    raw: &str,
    field: FieldName,
) -> Result<PermissionName, Error> {
    raw.parse().map_err(|_| {
        field_error(
            field,
            ErrorCode::InvalidPermissionName,
            format!("{} is not a known permission name", field.as_str()),
            Some(raw),
        )
    })
}

/// Deserialize a present field (including `null`) as `Some`.
///
/// Paired with `#[serde(default)]` this separates an absent field (`None`)
/// from an explicit `null` (`Some(None)`).
pub(crate) fn deserialize_some<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    T::deserialize(deserializer).map(Some)
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use serde_json::{Value, json};

    use super::*;

    const ID: FieldName = FieldName::new("id");

    fn detail<'a>(error: &'a Error, key: &str) -> Option<&'a Value> {
        error.details().and_then(|details| details.get(key))
    }

    #[rstest]
    #[case("1", 1)]
    #[case(" 42 ", 42)]
    #[case("2147483647", i32::MAX)]
    fn parse_id_accepts_positive_integers(#[case] raw: &str, #[case] expected: i32) {
        assert_eq!(parse_id(raw, ID).expect("valid id"), expected);
    }

    #[rstest]
    #[case("0")]
    #[case("-3")]
    #[case("abc")]
    #[case("2147483648")]
    #[case("")]
    fn parse_id_rejects_everything_else(#[case] raw: &str) {
        let err = parse_id(raw, ID).expect_err("invalid id");

        assert_eq!(err.code(), crate::domain::ErrorCode::InvalidRequest);
        assert_eq!(detail(&err, "code"), Some(&json!("invalid_id")));
        assert_eq!(detail(&err, "value"), Some(&json!(raw)));
    }

    #[rstest]
    fn page_query_defaults() {
        let request = PageQuery::default().into_page_request().expect("defaults");

        assert_eq!((request.page(), request.limit()), (1, 10));
    }

    #[rstest]
    #[case(Some("0"), None, "page", "invalid_page")]
    #[case(None, Some("ten"), "limit", "invalid_limit")]
    fn page_query_names_the_bad_field(
        #[case] page: Option<&str>,
        #[case] limit: Option<&str>,
        #[case] field: &str,
        #[case] code: &str,
    ) {
        let query = PageQuery {
            page: page.map(str::to_owned),
            limit: limit.map(str::to_owned),
        };

        let err = query.into_page_request().expect_err("invalid page query");
        assert_eq!(detail(&err, "field"), Some(&json!(field)));
        assert_eq!(detail(&err, "code"), Some(&json!(code)));
    }

    #[rstest]
    fn limit_query_uses_default_and_rejects_zero() {
        assert_eq!(LimitQuery::default().parse_or(12).expect("default"), 12);

        let zero = LimitQuery {
            limit: Some("0".into()),
        };
        let err = zero.parse_or(12).expect_err("zero limit");
        assert_eq!(detail(&err, "code"), Some(&json!("invalid_limit")));
    }

    #[rstest]
    fn unknown_permission_name_is_reported_with_value() {
        let err = parse_permission_name("FLY_PLANES", FieldName::new("name"))
            .expect_err("unknown name");

        assert_eq!(detail(&err, "field"), Some(&json!("name")));
        assert_eq!(detail(&err, "code"), Some(&json!("invalid_permission_name")));
        assert_eq!(detail(&err, "value"), Some(&json!("FLY_PLANES")));
    }

    #[rstest]
    fn blank_role_name_is_rejected() {
        let err = parse_role_name("   ".into(), FieldName::new("name")).expect_err("blank");

        assert_eq!(detail(&err, "code"), Some(&json!("empty_field")));
    }

    #[rstest]
    fn bad_email_is_rejected() {
        let err = parse_email("not-an-email".into(), FieldName::new("email")).expect_err("email");

        assert_eq!(detail(&err, "code"), Some(&json!("invalid_email")));
    }

    #[derive(Debug, Deserialize)]
    struct Patch {
        #[serde(default, deserialize_with = "deserialize_some")]
        name: Option<Option<String>>,
    }

    #[rstest]
    #[case("{}", None)]
    #[case(r#"{"name":null}"#, Some(None))]
    #[case(r#"{"name":"Ada"}"#, Some(Some("Ada".to_owned())))]
    fn deserialize_some_separates_absent_from_null(
        #[case] body: &str,
        #[case] expected: Option<Option<String>>,
    ) {
        let patch: Patch = serde_json::from_str(body).expect("valid JSON");
        assert_eq!(patch.name, expected);
    }
}
