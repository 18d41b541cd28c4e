//! User account data model.

use std::fmt;

use chrono::{DateTime, Utc};

/// Store-assigned user identifier.
///
/// Identifiers are generated by the database on insert and never change
/// afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct UserId(i64);

impl UserId {
    /// Wrap a raw identifier read from the store or supplied by a caller.
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    /// Access the raw identifier.
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl From<i64> for UserId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Registration payload for a user that does not exist yet.
///
/// The store assigns `id`, `created_at`, and `updated_at`; the password hash
/// is write-only and never read back.
#[derive(Clone, PartialEq, Eq)]
pub struct NewUser {
    /// Login email; uniqueness is enforced by the store.
    pub email: String,
    /// Pre-hashed password. Hashing happens upstream of this layer.
    pub password_hash: String,
    /// Given name.
    pub first_name: String,
    /// Middle name, empty when absent.
    pub middle_name: String,
    /// Family name.
    pub last_name: String,
}

impl fmt::Debug for NewUser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewUser")
            .field("email", &self.email)
            .field("password_hash", &"<redacted>")
            .field("first_name", &self.first_name)
            .field("middle_name", &self.middle_name)
            .field("last_name", &self.last_name)
            .finish()
    }
}

/// Stored user account as returned by reads.
///
/// ## Ownership
/// - `id` and `created_at` are owned by the store.
/// - `updated_at` is refreshed by the repository on profile updates only;
///   blocking and unblocking leave it untouched.
/// - `is_blocked` changes only through the block/unblock operations.
/// - `sign_in` is session state held by callers; it is not persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    /// Store-assigned identifier.
    pub id: UserId,
    /// Login email.
    pub email: String,
    /// Given name.
    pub first_name: String,
    /// Middle name, empty when absent.
    pub middle_name: String,
    /// Family name.
    pub last_name: String,
    /// Avatar location, empty when unset.
    pub profile_image_url: String,
    /// Whether the caller currently considers the user signed in.
    pub sign_in: bool,
    /// Whether the account is blocked.
    pub is_blocked: bool,
    /// Insertion timestamp.
    pub created_at: DateTime<Utc>,
    /// Last profile update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Pagination window for list queries.
///
/// Values are passed to the store unvalidated; choosing a sensible window is
/// the caller's responsibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    /// Maximum number of rows to return.
    pub limit: i64,
    /// Number of rows to skip.
    pub offset: i64,
}

impl PageRequest {
    /// Build a window of at most `limit` rows starting after `offset` rows.
    pub const fn new(limit: i64, offset: i64) -> Self {
        Self { limit, offset }
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn user_id_round_trips_raw_value() {
        let id = UserId::from(42);
        assert_eq!(id.get(), 42);
        assert_eq!(id.to_string(), "42");
    }

    #[rstest]
    fn new_user_debug_redacts_password_hash() {
        let user = NewUser {
            email: "ada@example.com".to_owned(),
            password_hash: "$argon2id$secret".to_owned(),
            first_name: "Ada".to_owned(),
            middle_name: String::new(),
            last_name: "Lovelace".to_owned(),
        };

        let rendered = format!("{user:?}");

        assert!(rendered.contains("ada@example.com"));
        assert!(!rendered.contains("secret"));
        assert!(rendered.contains("<redacted>"));
    }
}
