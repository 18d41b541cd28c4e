//! PostgreSQL-backed `UserRepository` implementation using Diesel ORM.
//!
//! Each operation checks out one pooled connection and runs a single
//! statement. The store generates identities and insertion timestamps; the
//! repository stamps `updated_at` on profile updates using its clock.

use std::sync::Arc;

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use mockable::{Clock, DefaultClock};
use tracing::debug;

use crate::domain::ports::{UserPersistenceError, UserRepository};
use crate::domain::{NewUser, PageRequest, User, UserId};

use super::diesel_error_mapping::{describe_diesel_error, describe_pool_error};
use super::models::{NewUserRow, UserProfileChangeset, UserRow};
use super::pool::DbPool;
use super::schema::users;

const CREATE_USER: &str = "create user";
const GET_USER: &str = "get user";
const UPDATE_USER: &str = "update user";
const DELETE_USER: &str = "delete user";
const LIST_USERS: &str = "list users";
const BLOCK_USER: &str = "block user";
const UNBLOCK_USER: &str = "unblock user";

/// Diesel-backed implementation of the `UserRepository` port.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
    clock: Arc<dyn Clock>,
}

impl DieselUserRepository {
    /// Create a repository that stamps updates with the system clock.
    pub fn new(pool: DbPool) -> Self {
        Self::with_clock(pool, Arc::new(DefaultClock))
    }

    /// Create a repository with an explicit clock for `updated_at`.
    pub fn with_clock(pool: DbPool, clock: Arc<dyn Clock>) -> Self {
        Self { pool, clock }
    }

    /// Set `is_blocked` on one row, leaving `updated_at` alone.
    async fn set_blocked(
        &self,
        id: UserId,
        blocked: bool,
        operation: &'static str,
    ) -> Result<usize, UserPersistenceError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| UserPersistenceError::write(operation, describe_pool_error(err)))?;

        let affected = diesel::update(users::table.find(id.get()))
            .set(users::is_blocked.eq(blocked))
            .execute(&mut conn)
            .await
            .map_err(|err| UserPersistenceError::write(operation, describe_diesel_error(&err)))?;

        log_if_unmatched(operation, id, affected);
        Ok(affected)
    }
}

fn log_if_unmatched(operation: &'static str, id: UserId, affected: usize) {
    if affected == 0 {
        debug!(operation, user_id = id.get(), "no user matched");
    }
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn create_user(&self, user: &NewUser) -> Result<User, UserPersistenceError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| UserPersistenceError::write(CREATE_USER, describe_pool_error(err)))?;

        let row = diesel::insert_into(users::table)
            .values(NewUserRow::from(user))
            .returning(UserRow::as_returning())
            .get_result::<UserRow>(&mut conn)
            .await
            .map_err(|err| UserPersistenceError::write(CREATE_USER, describe_diesel_error(&err)))?;

        Ok(User::from(row))
    }

    async fn get_user(&self, id: UserId) -> Result<User, UserPersistenceError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| UserPersistenceError::read(GET_USER, describe_pool_error(err)))?;

        let row = users::table
            .find(id.get())
            .select(UserRow::as_select())
            .first::<UserRow>(&mut conn)
            .await
            .optional()
            .map_err(|err| UserPersistenceError::read(GET_USER, describe_diesel_error(&err)))?;

        row.map(User::from)
            .ok_or_else(|| UserPersistenceError::not_found(id.get()))
    }

    async fn update_user(&self, user: &User) -> Result<usize, UserPersistenceError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| UserPersistenceError::write(UPDATE_USER, describe_pool_error(err)))?;

        let changeset = UserProfileChangeset::new(user, self.clock.utc());
        let affected = diesel::update(users::table.find(user.id.get()))
            .set(&changeset)
            .execute(&mut conn)
            .await
            .map_err(|err| UserPersistenceError::write(UPDATE_USER, describe_diesel_error(&err)))?;

        log_if_unmatched(UPDATE_USER, user.id, affected);
        Ok(affected)
    }

    async fn delete_user(&self, id: UserId) -> Result<usize, UserPersistenceError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| UserPersistenceError::delete(DELETE_USER, describe_pool_error(err)))?;

        let affected = diesel::delete(users::table.find(id.get()))
            .execute(&mut conn)
            .await
            .map_err(|err| {
                UserPersistenceError::delete(DELETE_USER, describe_diesel_error(&err))
            })?;

        log_if_unmatched(DELETE_USER, id, affected);
        Ok(affected)
    }

    async fn list_users(&self, page: PageRequest) -> Result<Vec<User>, UserPersistenceError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| UserPersistenceError::read(LIST_USERS, describe_pool_error(err)))?;

        // A failed decode of any row fails the whole page.
        let rows = users::table
            .select(UserRow::as_select())
            .order(users::id.asc())
            .limit(page.limit)
            .offset(page.offset)
            .load::<UserRow>(&mut conn)
            .await
            .map_err(|err| UserPersistenceError::read(LIST_USERS, describe_diesel_error(&err)))?;

        Ok(rows.into_iter().map(User::from).collect())
    }

    async fn block_user(&self, id: UserId) -> Result<usize, UserPersistenceError> {
        self.set_blocked(id, true, BLOCK_USER).await
    }

    async fn unblock_user(&self, id: UserId) -> Result<usize, UserPersistenceError> {
        self.set_blocked(id, false, UNBLOCK_USER).await
    }
}
