//! Accounts service entry-point: loads configuration and opens the user store.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

use std::io;
use std::process::ExitCode;

use clap::Parser;
use tokio::runtime::Builder;
use tracing::{error, info};

use accounts_backend::config::{ConfigArgs, DefaultConfigEnv, resolve_and_load};
use accounts_backend::outbound::persistence::{DbPool, DieselUserRepository, PoolConfig};
use accounts_backend::{AppConfig, telemetry};

fn main() -> ExitCode {
    telemetry::init();

    let args = ConfigArgs::parse();
    // Configuration errors are not recoverable at startup.
    let config = match resolve_and_load(&args, &DefaultConfigEnv) {
        Ok(config) => config,
        Err(err) => {
            error!(error = %err, "failed to load configuration");
            return ExitCode::FAILURE;
        }
    };

    match run(config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(error = %err, "accounts backend stopped");
            ExitCode::FAILURE
        }
    }
}

fn run(config: AppConfig) -> io::Result<()> {
    let runtime = Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|err| io::Error::other(format!("create Tokio runtime: {err}")))?;
    runtime.block_on(async_main(config))
}

async fn async_main(config: AppConfig) -> io::Result<()> {
    let pool = DbPool::new(PoolConfig::new(&config.storage_path))
        .await
        .map_err(|err| io::Error::other(format!("create database pool: {err}")))?;
    let users = DieselUserRepository::new(pool);

    info!(
        env = %config.env,
        grpc_port = config.grpc.port,
        grpc_timeout = ?config.grpc.timeout,
        migrations_path = %config.migrations_path,
        "accounts backend ready"
    );

    tokio::signal::ctrl_c().await?;
    info!("shutdown signal received");
    // The repository owns the pool; dropping it closes idle connections.
    drop(users);
    Ok(())
}
