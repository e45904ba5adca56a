//! Driving port for user mutations.

use async_trait::async_trait;

use crate::domain::{Error, NewUser, UserChanges, UserProfile};

/// Driving port for user write operations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserCommand: Send + Sync {
    /// Register a user, hashing the password when one is supplied.
    ///
    /// Fails with `conflict` when the email or Slack id is taken and with
    /// `invalid_request` when the role does not exist.
    async fn create_user(&self, user: NewUser) -> Result<UserProfile, Error>;

    async fn update_user(&self, id: i32, changes: UserChanges) -> Result<UserProfile, Error>;

    async fn delete_user(&self, id: i32) -> Result<(), Error>;
}
