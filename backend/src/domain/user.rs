//! User data model.

use std::fmt;

use chrono::{DateTime, Utc};

use crate::domain::RoleSummary;

/// Validation errors raised while building user inputs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserValidationError {
    EmptySlackId,
    InvalidEmail,
}

impl fmt::Display for UserValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptySlackId => write!(f, "slack id must not be empty"),
            Self::InvalidEmail => write!(f, "email must be a valid address"),
        }
    }
}

impl std::error::Error for UserValidationError {}

/// Email address with a minimal structural check.
///
/// The address must contain exactly one `@` with non-empty local and domain
/// parts, the domain must contain a dot, and no whitespace is allowed.
///
/// # Examples
/// ```
/// use rbac_api::domain::EmailAddress;
///
/// assert!(EmailAddress::new("ada@example.com").is_ok());
/// assert!(EmailAddress::new("ada@").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EmailAddress(String);

impl EmailAddress {
    pub fn new(raw: impl Into<String>) -> Result<Self, UserValidationError> {
        let raw = raw.into();
        if raw.chars().any(char::is_whitespace) {
            return Err(UserValidationError::InvalidEmail);
        }
        let mut parts = raw.split('@');
        let (Some(local), Some(domain), None) = (parts.next(), parts.next(), parts.next()) else {
            return Err(UserValidationError::InvalidEmail);
        };
        let domain_ok = domain
            .split('.')
            .all(|label| !label.is_empty())
            && domain.contains('.');
        if local.is_empty() || !domain_ok {
            return Err(UserValidationError::InvalidEmail);
        }
        Ok(Self(raw))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl AsRef<str> for EmailAddress {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier of the user on the team chat platform.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SlackId(String);

impl SlackId {
    pub fn new(raw: impl Into<String>) -> Result<Self, UserValidationError> {
        let raw = raw.into();
        if raw.trim().is_empty() {
            return Err(UserValidationError::EmptySlackId);
        }
        Ok(Self(raw))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl AsRef<str> for SlackId {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

/// Public view of a user. The password hash never leaves persistence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserProfile {
    pub id: i32,
    pub slack_id: String,
    pub name: Option<String>,
    pub email: String,
    pub points: i32,
    pub created_at: DateTime<Utc>,
    pub role: RoleSummary,
}

/// Input for creating a user, as accepted by the driving port.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub slack_id: SlackId,
    pub name: Option<String>,
    pub email: EmailAddress,
    /// Plaintext password; hashed before it reaches storage.
    pub password: Option<String>,
    pub role_id: i32,
}

/// Partial update for a user, as accepted by the driving port.
///
/// Every `None` leaves the column unchanged. `name: Some(None)` clears the
/// display name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserChanges {
    pub name: Option<Option<String>>,
    pub email: Option<EmailAddress>,
    pub password: Option<String>,
    pub role_id: Option<i32>,
    pub points: Option<i32>,
}

/// Row-level insert handed to the repository once the password is hashed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserDraft {
    pub slack_id: String,
    pub name: Option<String>,
    pub email: String,
    pub password_hash: Option<String>,
    pub role_id: i32,
}

/// Row-level update handed to the repository once the password is hashed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserPatch {
    pub name: Option<Option<String>>,
    pub email: Option<String>,
    pub password_hash: Option<String>,
    pub role_id: Option<i32>,
    pub points: Option<i32>,
}
