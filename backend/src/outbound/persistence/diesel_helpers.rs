//! Shared helpers for Diesel repository implementations.
//!
//! This module provides common utilities for database access including:
//! - Error classification from Diesel errors into retryable and permanent
//!   failures
//! - Per-transaction timeout configuration
//! - Checked integer conversions between database and domain types

use std::time::Duration;

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use diesel_async::{AsyncPgConnection, SimpleAsyncConnection};
use tracing::debug;

use super::pool::PoolError;

/// Coarse classification of a storage failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum StoreFailure {
    /// Connection loss, timeout or serialisation conflict; the caller may
    /// retry.
    Transient(String),
    /// Anything else.
    Permanent(String),
}

/// Extract a readable message from a pool error.
pub(crate) fn map_pool_error_message(error: PoolError) -> String {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => message,
    }
}

fn is_timeout_message(message: &str) -> bool {
    let lower = message.to_lowercase();
    lower.contains("statement timeout") || lower.contains("lock timeout")
}

/// Classify a Diesel error and emit debug context.
pub(crate) fn classify_diesel_error(error: &DieselError, operation: &str) -> StoreFailure {
    match error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), %operation, "diesel operation failed");
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(error),
            %operation,
            "diesel operation failed"
        ),
    }

    match error {
        DieselError::DatabaseError(
            DatabaseErrorKind::ClosedConnection
            | DatabaseErrorKind::SerializationFailure
            | DatabaseErrorKind::UnableToSendCommand,
            _,
        ) => StoreFailure::Transient(format!("{operation}: database connection error")),
        DieselError::DatabaseError(_, info) if is_timeout_message(info.message()) => {
            StoreFailure::Transient(format!("{operation}: database timeout"))
        }
        DieselError::NotFound => StoreFailure::Permanent(format!("{operation}: record not found")),
        DieselError::QueryBuilderError(_) => {
            StoreFailure::Permanent(format!("{operation}: database query error"))
        }
        _ => StoreFailure::Permanent(format!("{operation}: database error")),
    }
}

/// Bound statement runtime and lock waits for the current transaction.
pub(crate) async fn apply_local_timeouts(
    conn: &mut AsyncPgConnection,
    timeout: Duration,
) -> Result<(), DieselError> {
    let millis = timeout.as_millis();
    conn.batch_execute(&format!(
        "SET LOCAL statement_timeout = {millis}; SET LOCAL lock_timeout = {millis}"
    ))
    .await
}

/// Convert a non-negative database integer into a domain count.
pub(crate) fn to_domain_count(value: i32, column: &str) -> Result<u32, String> {
    u32::try_from(value).map_err(|_| format!("{column} is negative: {value}"))
}

/// Convert a domain count into a database integer.
pub(crate) fn to_db_count(value: u32, column: &str) -> Result<i32, String> {
    i32::try_from(value).map_err(|_| format!("{column} exceeds database range: {value}"))
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    fn database_error(kind: DatabaseErrorKind, message: &str) -> DieselError {
        DieselError::DatabaseError(kind, Box::new(message.to_owned()))
    }

    #[rstest]
    #[case(database_error(DatabaseErrorKind::ClosedConnection, "gone"))]
    #[case(database_error(DatabaseErrorKind::SerializationFailure, "retry"))]
    #[case(database_error(
        DatabaseErrorKind::Unknown,
        "canceling statement due to statement timeout"
    ))]
    #[case(database_error(
        DatabaseErrorKind::Unknown,
        "canceling statement due to lock timeout"
    ))]
    fn retryable_failures_are_transient(#[case] error: DieselError) {
        let failure = classify_diesel_error(&error, "record attempt");
        assert!(matches!(failure, StoreFailure::Transient(_)));
    }

    #[rstest]
    #[case(DieselError::NotFound)]
    #[case(database_error(DatabaseErrorKind::CheckViolation, "attempts_left"))]
    #[case(database_error(DatabaseErrorKind::UniqueViolation, "users_phone_key"))]
    fn other_failures_are_permanent(#[case] error: DieselError) {
        let failure = classify_diesel_error(&error, "register");
        assert!(matches!(failure, StoreFailure::Permanent(_)));
    }

    #[rstest]
    fn pool_messages_are_extracted() {
        assert_eq!(
            map_pool_error_message(PoolError::checkout("timed out")),
            "timed out"
        );
    }

    #[rstest]
    fn counts_reject_out_of_range_values() {
        assert_eq!(to_domain_count(3, "attempts_left"), Ok(3));
        assert!(to_domain_count(-1, "attempts_left").is_err());
        assert!(to_db_count(u32::MAX, "attempts_left").is_err());
    }
}
