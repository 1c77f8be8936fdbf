//! Shared Diesel error mapping for the repositories in this module.
//!
//! Each repository owns a port error enum with `connection` and `query`
//! style constructors; these helpers route pool and Diesel failures into
//! them so the classification stays consistent.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

use super::pool::PoolError;

/// Map pool errors into a repository-specific connection error constructor.
pub(super) fn map_pool_error<E, C>(error: PoolError, connection: C) -> E
where
    C: FnOnce(String) -> E,
{
    let message = match error {
        PoolError::Checkout { message } | PoolError::Build { message } => message,
    };
    connection(message)
}

/// Whether `error` is a unique constraint violation.
pub(super) fn is_unique_violation(error: &DieselError) -> bool {
    matches!(
        error,
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _)
    )
}

/// Constraint name reported with a database error, if any.
pub(super) fn constraint_name(error: &DieselError) -> Option<String> {
    match error {
        DieselError::DatabaseError(_, info) => info.constraint_name().map(str::to_owned),
        _ => None,
    }
}

/// Map common Diesel error variants into query/connection constructors.
///
/// Closed connections count as connection failures; everything else is a
/// query failure carrying the database message.
pub(super) fn map_diesel_error<E, Q, C>(
    error: DieselError,
    operation: &'static str,
    query: Q,
    connection: C,
) -> E
where
    Q: FnOnce(String) -> E,
    C: FnOnce(String) -> E,
{
    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), operation, "diesel operation failed");
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(&error),
            operation,
            "diesel operation failed"
        ),
    }

    match error {
        DieselError::NotFound => query(format!("{operation}: record not found")),
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, info) => {
            connection(info.message().to_owned())
        }
        DieselError::DatabaseError(_, info) => query(info.message().to_owned()),
        DieselError::DeserializationError(err) => {
            query(format!("{operation}: could not decode row: {err}"))
        }
        _ => query(format!("{operation}: database error")),
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for error classification.
    use super::*;
    use rstest::rstest;

    #[derive(Debug, PartialEq, Eq)]
    enum Mapped {
        Query(String),
        Connection(String),
    }

    #[rstest]
    fn pool_errors_become_connection_errors() {
        let mapped = map_pool_error(PoolError::checkout("connection refused"), Mapped::Connection);

        assert_eq!(mapped, Mapped::Connection("connection refused".to_owned()));
    }

    #[rstest]
    fn not_found_names_the_operation() {
        let mapped = map_diesel_error(
            DieselError::NotFound,
            "load user",
            Mapped::Query,
            Mapped::Connection,
        );

        assert_eq!(mapped, Mapped::Query("load user: record not found".to_owned()));
    }

    #[rstest]
    fn closed_connections_are_connection_errors() {
        let error = DieselError::DatabaseError(
            DatabaseErrorKind::ClosedConnection,
            Box::new("server closed the connection".to_owned()),
        );

        let mapped = map_diesel_error(error, "load user", Mapped::Query, Mapped::Connection);

        assert_eq!(
            mapped,
            Mapped::Connection("server closed the connection".to_owned())
        );
    }

    #[rstest]
    fn unique_violations_are_detected() {
        let error = DieselError::DatabaseError(
            DatabaseErrorKind::UniqueViolation,
            Box::new("duplicate key value".to_owned()),
        );

        assert!(is_unique_violation(&error));
        assert!(!is_unique_violation(&DieselError::NotFound));
        assert_eq!(constraint_name(&error), None);
    }
}
