//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Concrete implementations of the role, permission and user repository
//! ports, backed by PostgreSQL through `diesel-async` and a shared `bb8`
//! pool.
//!
//! - **Thin adapters**: repositories translate between Diesel rows and
//!   domain types; business rules live in the domain services.
//! - **Internal models**: row structs (`models.rs`) and the table DSL
//!   (`schema.rs`) never leave this module.
//! - **Transactional writes**: every check-then-act sequence runs inside one
//!   transaction.
//!
//! # Example
//!
//! ```ignore
//! use rbac_api::outbound::persistence::{DbPool, DieselRoleRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/rbac")).await?;
//! let roles = DieselRoleRepository::new(pool);
//! ```

use pagination::PageRequest;

mod diesel_error_mapping;
mod diesel_permission_repository;
mod diesel_role_repository;
mod diesel_user_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_permission_repository::DieselPermissionRepository;
pub use diesel_role_repository::DieselRoleRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use migrations::{MIGRATIONS, MigrationError, run_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};

fn page_limit(page: PageRequest) -> i64 {
    i64::from(page.limit())
}

fn page_offset(page: PageRequest) -> i64 {
    i64::try_from(page.offset()).unwrap_or(i64::MAX)
}
