//! Accounts backend library: user persistence and startup configuration.
//!
//! The crate follows a hexagonal layout. `domain` owns the user entity and
//! the repository port, `outbound::persistence` adapts that port to
//! PostgreSQL, and `config` resolves the process configuration once at
//! startup.

pub mod config;
pub mod domain;
pub mod outbound;
pub mod telemetry;

pub use config::{AppConfig, ConfigError, GrpcConfig};
