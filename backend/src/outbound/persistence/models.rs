//! Internal Diesel row structs for the `users` table.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain.

use chrono::{DateTime, Utc};
use diesel::prelude::*;

use crate::domain::{NewUser, User, UserId};

use super::schema::users;

/// Read projection of the users table. Omits `password_hash`.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: i64,
    pub email: String,
    pub first_name: String,
    pub middle_name: String,
    pub last_name: String,
    pub profile_image_url: String,
    pub is_blocked: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        Self {
            id: UserId::new(row.id),
            email: row.email,
            first_name: row.first_name,
            middle_name: row.middle_name,
            last_name: row.last_name,
            profile_image_url: row.profile_image_url,
            sign_in: false,
            is_blocked: row.is_blocked,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Insertable struct for creating new user records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub email: &'a str,
    pub password_hash: &'a str,
    pub first_name: &'a str,
    pub middle_name: &'a str,
    pub last_name: &'a str,
}

impl<'a> From<&'a NewUser> for NewUserRow<'a> {
    fn from(user: &'a NewUser) -> Self {
        Self {
            email: &user.email,
            password_hash: &user.password_hash,
            first_name: &user.first_name,
            middle_name: &user.middle_name,
            last_name: &user.last_name,
        }
    }
}

/// Changeset for profile updates; always stamps `updated_at`.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = users)]
pub(crate) struct UserProfileChangeset<'a> {
    pub first_name: &'a str,
    pub middle_name: &'a str,
    pub last_name: &'a str,
    pub profile_image_url: &'a str,
    pub updated_at: DateTime<Utc>,
}

impl<'a> UserProfileChangeset<'a> {
    pub(crate) fn new(user: &'a User, updated_at: DateTime<Utc>) -> Self {
        Self {
            first_name: &user.first_name,
            middle_name: &user.middle_name,
            last_name: &user.last_name,
            profile_image_url: &user.profile_image_url,
            updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for row conversions.
    use super::*;
    use chrono::TimeZone;
    use rstest::rstest;

    fn timestamp() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0)
            .single()
            .expect("valid fixture timestamp")
    }

    #[rstest]
    fn user_row_converts_to_domain_user() {
        let row = UserRow {
            id: 7,
            email: "grace@example.com".to_owned(),
            first_name: "Grace".to_owned(),
            middle_name: "Brewster".to_owned(),
            last_name: "Hopper".to_owned(),
            profile_image_url: "https://cdn.example.com/grace.png".to_owned(),
            is_blocked: true,
            created_at: timestamp(),
            updated_at: timestamp(),
        };

        let user = User::from(row);

        assert_eq!(user.id, UserId::new(7));
        assert_eq!(user.middle_name, "Brewster");
        assert!(user.is_blocked);
        assert!(!user.sign_in);
        assert_eq!(user.created_at, user.updated_at);
    }

    #[rstest]
    fn profile_changeset_copies_profile_fields_and_stamp() {
        let user = User {
            id: UserId::new(3),
            email: "kept@example.com".to_owned(),
            first_name: "New".to_owned(),
            middle_name: String::new(),
            last_name: "Name".to_owned(),
            profile_image_url: "https://cdn.example.com/new.png".to_owned(),
            sign_in: false,
            is_blocked: false,
            created_at: timestamp(),
            updated_at: timestamp(),
        };
        let stamped = timestamp() + chrono::Duration::minutes(5);

        let changeset = UserProfileChangeset::new(&user, stamped);

        assert_eq!(changeset.first_name, "New");
        assert_eq!(changeset.profile_image_url, "https://cdn.example.com/new.png");
        assert_eq!(changeset.updated_at, stamped);
    }
}
