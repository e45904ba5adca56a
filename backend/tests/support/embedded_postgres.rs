//! Database lifecycle helpers for embedded PostgreSQL suites.
//!
//! Reset uses `postgres` rather than Diesel so `DROP DATABASE` never runs
//! inside a transaction. Schema setup applies the crate's own embedded
//! migrations, so tests and production cannot drift.

use diesel::Connection;
use diesel::pg::PgConnection;
use diesel_migrations::MigrationHarness;
use pg_embedded_setup_unpriv::TestCluster;
use postgres::{Client, NoTls};
use rbac_api::outbound::persistence::MIGRATIONS;

use super::describe_pg_error;

const ADMIN_DB: &str = "postgres";

/// Drop and recreate `name`, returning its connection URL.
pub fn reset_database(cluster: &TestCluster, name: &str) -> Result<String, String> {
    let admin_url = cluster.connection().database_url(ADMIN_DB);
    let mut client =
        Client::connect(&admin_url, NoTls).map_err(|err| describe_pg_error(&err))?;
    client
        .batch_execute(&format!(
            "DROP DATABASE IF EXISTS \"{name}\" WITH (FORCE); CREATE DATABASE \"{name}\";"
        ))
        .map_err(|err| describe_pg_error(&err))?;
    Ok(cluster.connection().database_url(name))
}

/// Apply every pending migration to the database at `url`.
pub fn migrate_schema(url: &str) -> Result<(), String> {
    let mut conn = PgConnection::establish(url).map_err(|err| format!("connect: {err}"))?;
    conn.run_pending_migrations(MIGRATIONS)
        .map_err(|err| format!("migration: {err}"))?;
    Ok(())
}

/// Execute raw SQL, typically to seed rows the repositories cannot create.
pub fn execute_sql(url: &str, sql: &str) -> Result<(), String> {
    let mut client = Client::connect(url, NoTls).map_err(|err| describe_pg_error(&err))?;
    client
        .batch_execute(sql)
        .map_err(|err| describe_pg_error(&err))
}
