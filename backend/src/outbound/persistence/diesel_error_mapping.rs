//! Diesel and pool failures translated into repository errors.
//!
//! Every repository error implements [`StorageFailure`], so one set of
//! helpers serves all three adapters. Failures are logged at `debug` with the
//! operation name before they are flattened into a message.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

use crate::domain::ports::StorageFailure;

use super::pool::PoolError;

/// Failure raised inside a transaction closure.
///
/// `Domain` aborts the transaction with a typed repository error (duplicate
/// name, unknown reference) and rolls it back.
#[derive(Debug)]
pub(crate) enum TxError<E> {
    Diesel(DieselError),
    Domain(E),
}

impl<E> From<DieselError> for TxError<E> {
    fn from(error: DieselError) -> Self {
        Self::Diesel(error)
    }
}

impl<E: StorageFailure> TxError<E> {
    /// Collapse into the repository error. Constraint violations are offered
    /// to `classify` first; anything it declines becomes a storage failure.
    pub(crate) fn resolve(
        self,
        operation: &'static str,
        classify: impl FnOnce(&DieselError) -> Option<E>,
    ) -> E {
        match self {
            Self::Domain(error) => error,
            Self::Diesel(error) => {
                classify(&error).unwrap_or_else(|| storage_error(operation, error))
            }
        }
    }
}

/// A pool checkout or build failure is always a connection failure.
pub(crate) fn pool_error<E: StorageFailure>(error: PoolError) -> E {
    debug!(error = %error, "database pool unavailable");
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => {
            E::connection_failed(message)
        }
    }
}

/// Translate a Diesel failure outside any constraint handling.
pub(crate) fn storage_error<E: StorageFailure>(operation: &'static str, error: DieselError) -> E {
    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(operation, ?kind, message = info.message(), "diesel operation failed");
        }
        other => debug!(operation, error = %other, "diesel operation failed"),
    }

    match error {
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            E::connection_failed("database connection error".to_owned())
        }
        DieselError::NotFound => E::query_failed("record not found".to_owned()),
        DieselError::QueryBuilderError(_) => E::query_failed("database query error".to_owned()),
        _ => E::query_failed("database error".to_owned()),
    }
}

/// Whether `error` is a unique constraint violation.
pub(crate) fn is_unique_violation(error: &DieselError) -> bool {
    matches!(
        error,
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _)
    )
}

/// Whether `error` is a foreign key violation.
pub(crate) fn is_foreign_key_violation(error: &DieselError) -> bool {
    matches!(
        error,
        DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, _)
    )
}
