//! Helpers shared by the embedded PostgreSQL suites.
//!
//! Every file under `tests/` is its own crate, so each pulls this in with
//! `mod support;` and uses whatever subset it needs.

#![allow(dead_code, reason = "each test crate uses a different subset")]

pub mod embedded_postgres;
pub mod pg_embed;

pub use embedded_postgres::{execute_sql, migrate_schema, reset_database};
pub use pg_embed::test_cluster;

const SKIP_VAR: &str = "SKIP_TEST_CLUSTER";

/// Give up on a suite whose cluster would not start.
///
/// Returns `None` when `SKIP_TEST_CLUSTER` is truthy so the test can bail
/// out early; otherwise panics with `reason`.
pub fn handle_cluster_setup_failure<T>(reason: impl std::fmt::Display) -> Option<T> {
    let skip = std::env::var(SKIP_VAR)
        .is_ok_and(|value| ["1", "true", "yes"].contains(&value.to_ascii_lowercase().as_str()));
    assert!(skip, "embedded PostgreSQL unavailable: {reason} (set {SKIP_VAR}=1 to skip)");
    eprintln!("{SKIP_VAR}: {reason}");
    None
}

/// One-line description of a `postgres` failure including SQLSTATE, detail
/// and hint when the server sent them.
pub fn describe_pg_error(error: &postgres::Error) -> String {
    match error.as_db_error() {
        None => error.to_string(),
        Some(db) => {
            let extras = [("detail", db.detail()), ("hint", db.hint())]
                .into_iter()
                .filter_map(|(label, text)| text.map(|text| format!("; {label}: {text}")))
                .collect::<String>();
            format!("{} [{}]{extras}", db.message(), db.code().code())
        }
    }
}
