//! Port abstraction for user persistence adapters and their errors.
use async_trait::async_trait;

use crate::domain::{NewUser, PageRequest, User, UserId};

/// Persistence errors raised by user repository adapters.
///
/// `operation` names what was attempted (for example `"create user"`).
/// `message` carries the store's own description so callers can inspect
/// causes such as a unique-constraint violation; this layer does not
/// classify them further.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserPersistenceError {
    /// No row matched the requested identifier.
    #[error("user {id} not found")]
    NotFound { id: i64 },
    /// An insert or update failed.
    #[error("failed to {operation}: {message}")]
    Write { operation: String, message: String },
    /// A read or row decode failed.
    #[error("failed to {operation}: {message}")]
    Read { operation: String, message: String },
    /// A delete failed.
    #[error("failed to {operation}: {message}")]
    Delete { operation: String, message: String },
}

impl UserPersistenceError {
    /// No user has identifier `id`.
    pub fn not_found(id: impl Into<i64>) -> Self {
        Self::NotFound { id: id.into() }
    }

    /// An insert or update named `operation` failed with `message`.
    pub fn write(operation: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Write {
            operation: operation.into(),
            message: message.into(),
        }
    }

    /// A read named `operation` failed with `message`.
    pub fn read(operation: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Read {
            operation: operation.into(),
            message: message.into(),
        }
    }

    /// A delete named `operation` failed with `message`.
    pub fn delete(operation: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Delete {
            operation: operation.into(),
            message: message.into(),
        }
    }
}

/// Store operations over the `users` table.
///
/// Every method is a single independent statement: no transactions and no
/// retries. Dropping a returned future abandons the statement and releases
/// its pooled connection, so callers bound latency with their own deadline.
///
/// Mutations keyed by identifier return the number of affected rows; a
/// count of zero means no row matched and is not an error.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a user and return it with its store-assigned `id`,
    /// `created_at`, and `updated_at`.
    async fn create_user(&self, user: &NewUser) -> Result<User, UserPersistenceError>;

    /// Fetch a user by identifier, failing with `NotFound` when absent.
    async fn get_user(&self, id: UserId) -> Result<User, UserPersistenceError>;

    /// Overwrite the names and profile image of `user.id`, stamping
    /// `updated_at` with the current time.
    ///
    /// `email`, the password hash, and `is_blocked` are left untouched.
    async fn update_user(&self, user: &User) -> Result<usize, UserPersistenceError>;

    /// Remove a user by identifier.
    async fn delete_user(&self, id: UserId) -> Result<usize, UserPersistenceError>;

    /// Return one page of users ordered by ascending `id`.
    async fn list_users(&self, page: PageRequest) -> Result<Vec<User>, UserPersistenceError>;

    /// Mark a user as blocked. `updated_at` is not changed.
    async fn block_user(&self, id: UserId) -> Result<usize, UserPersistenceError>;

    /// Clear the blocked flag. `updated_at` is not changed.
    async fn unblock_user(&self, id: UserId) -> Result<usize, UserPersistenceError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(UserPersistenceError::not_found(7), "user 7 not found")]
    #[case(
        UserPersistenceError::write("create user", "unique constraint \"users_email_key\""),
        "failed to create user: unique constraint \"users_email_key\""
    )]
    #[case(
        UserPersistenceError::read("list users", "relation \"users\" does not exist"),
        "failed to list users: relation \"users\" does not exist"
    )]
    #[case(
        UserPersistenceError::delete("delete user", "connection closed"),
        "failed to delete user: connection closed"
    )]
    fn errors_render_operation_and_cause(
        #[case] error: UserPersistenceError,
        #[case] expected: &str,
    ) {
        assert_eq!(error.to_string(), expected);
    }

    #[rstest]
    fn constructors_fill_named_fields() {
        assert_eq!(
            UserPersistenceError::read("get user", "timed out"),
            UserPersistenceError::Read {
                operation: "get user".to_owned(),
                message: "timed out".to_owned(),
            }
        );
    }
}
