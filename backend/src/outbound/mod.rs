//! Outbound adapters implementing the driven domain ports.
//!
//! - **persistence**: PostgreSQL repositories on Diesel with a `bb8` pool
//! - **hashing**: Argon2id password hashing
//!
//! Adapters translate between domain types and infrastructure types and hold
//! no business rules.

pub mod hashing;
pub mod persistence;
