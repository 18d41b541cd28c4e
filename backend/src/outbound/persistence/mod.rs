//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! This module provides the concrete implementation of the domain's
//! `UserRepository` port backed by PostgreSQL via Diesel, with async support
//! through `diesel-async` and `bb8` connection pooling.
//!
//! # Architecture
//!
//! - **Thin adapters**: the repository only translates between Diesel rows
//!   and domain types.
//! - **Internal models**: row structs (`models.rs`) and table definitions
//!   (`schema.rs`) never leave this module.
//! - **Pass-through pooling**: the repository borrows one connection per
//!   statement and reports checkout failures like any other store failure.
//!
//! # Example
//!
//! ```ignore
//! use accounts_backend::outbound::persistence::{DbPool, DieselUserRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new(&config.storage_path)).await?;
//! let repo = DieselUserRepository::new(pool);
//! ```

mod diesel_error_mapping;
mod diesel_user_repository;
mod models;
mod pool;
mod schema;

pub use diesel_user_repository::DieselUserRepository;
pub use pool::{DbPool, PoolConfig, PoolError};
