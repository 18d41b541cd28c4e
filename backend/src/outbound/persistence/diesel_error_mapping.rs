//! Shared rendering of Diesel and pool failures for repository errors.
//!
//! Repository errors carry the store's own message so that callers can tell,
//! for example, a unique-constraint violation from a dropped connection
//! without this layer classifying either.

use tracing::debug;

use super::pool::PoolError;

/// Describe a pool failure.
pub(super) fn describe_pool_error(error: PoolError) -> String {
    debug!(%error, "connection checkout failed");
    error.to_string()
}

/// Describe a Diesel failure, preferring the database's own message.
pub(super) fn describe_diesel_error(error: &diesel::result::Error) -> String {
    use diesel::result::Error as DieselError;

    match error {
        DieselError::DatabaseError(kind, info) => {
            debug!(
                ?kind,
                message = info.message(),
                constraint = info.constraint_name(),
                "diesel operation failed"
            );
            info.message().to_owned()
        }
        other => {
            debug!(
                error_type = %std::any::type_name_of_val(other),
                error = %other,
                "diesel operation failed"
            );
            other.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for failure descriptions.
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn pool_errors_keep_their_cause() {
        let described = describe_pool_error(PoolError::checkout("timed out waiting for connection"));
        assert!(described.contains("timed out waiting for connection"));
    }

    #[rstest]
    fn non_database_errors_use_display() {
        let described = describe_diesel_error(&diesel::result::Error::NotFound);
        assert_eq!(described, diesel::result::Error::NotFound.to_string());
    }
}
