//! Domain ports for the hexagonal boundary.
//!
//! Driving ports (`*Command`, `*Query`) are called by inbound adapters and
//! implemented by domain services. Driven ports (`*Repository`,
//! [`PasswordHasher`]) are called by the services and implemented by
//! outbound adapters.

mod macros;
pub(crate) use macros::define_port_error;
pub use macros::StorageFailure;

mod password_hasher;
mod permission_command;
mod permission_query;
mod permission_repository;
mod role_command;
mod role_query;
mod role_repository;
mod user_command;
mod user_query;
mod user_repository;

#[cfg(test)]
pub use password_hasher::MockPasswordHasher;
pub use password_hasher::{PasswordHashError, PasswordHasher};
#[cfg(test)]
pub use permission_command::MockPermissionCommand;
pub use permission_command::PermissionCommand;
#[cfg(test)]
pub use permission_query::MockPermissionQuery;
pub use permission_query::PermissionQuery;
#[cfg(test)]
pub use permission_repository::MockPermissionRepository;
pub use permission_repository::{PermissionRepository, PermissionRepositoryError};
#[cfg(test)]
pub use role_command::MockRoleCommand;
pub use role_command::RoleCommand;
#[cfg(test)]
pub use role_query::MockRoleQuery;
pub use role_query::RoleQuery;
#[cfg(test)]
pub use role_repository::MockRoleRepository;
pub use role_repository::{RoleRepository, RoleRepositoryError};
#[cfg(test)]
pub use user_command::MockUserCommand;
pub use user_command::UserCommand;
#[cfg(test)]
pub use user_query::MockUserQuery;
pub use user_query::UserQuery;
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserRepository, UserRepositoryError};
