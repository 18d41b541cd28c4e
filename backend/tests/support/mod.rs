//! Shared helper utilities for backend integration tests.
//!
//! Integration tests compile as separate crates under `backend/tests/`. This
//! module owns the embedded PostgreSQL lifecycle: a process-wide shared
//! cluster, one migrated temporary database per test, and helpers for
//! simulating schema loss.

use std::time::Duration;

use diesel::pg::PgConnection;
use diesel::{Connection, RunQueryDsl};
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use pg_embedded_setup_unpriv::{ClusterHandle, TemporaryDatabase};
use uuid::Uuid;

/// Embedded migrations from the backend/migrations directory.
const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

const SHARED_CLUSTER_RETRIES: usize = 5;
const SHARED_CLUSTER_RETRY_DELAY: Duration = Duration::from_millis(500);

/// Returns true when `SKIP_TEST_CLUSTER` is set to a truthy value.
///
/// Truthy values: "1", "true", "yes" (case-insensitive).
pub fn should_skip_test_cluster() -> bool {
    std::env::var("SKIP_TEST_CLUSTER")
        .map(|value| matches!(value.to_lowercase().as_str(), "1" | "true" | "yes"))
        .unwrap_or(false)
}

/// Handles embedded cluster setup failures consistently across suites.
///
/// When `SKIP_TEST_CLUSTER` is truthy, prints a skip marker and returns
/// `None`. Otherwise panics so a broken cluster fails the run.
pub fn handle_cluster_setup_failure<T>(reason: impl std::fmt::Display) -> Option<T> {
    if should_skip_test_cluster() {
        eprintln!("SKIP-TEST-CLUSTER: {reason}");
        None
    } else {
        panic!("Test cluster setup failed: {reason}. Set SKIP_TEST_CLUSTER=1 to skip.");
    }
}

/// Returns the process-wide embedded cluster, retrying transient bootstrap
/// failures.
///
/// Bootstrap panics (for example a missing privilege-dropping worker) are
/// reported as errors so [`handle_cluster_setup_failure`] applies its policy.
pub fn shared_cluster() -> Result<&'static ClusterHandle, String> {
    ensure_stable_password();
    ensure_worker_binary();
    let mut attempt = 1;
    loop {
        let outcome =
            std::panic::catch_unwind(pg_embedded_setup_unpriv::test_support::shared_cluster_handle)
                .map_err(|payload| panic_message(payload.as_ref()))?;
        match outcome {
            Ok(handle) => return Ok(handle),
            Err(error) => {
                if attempt >= SHARED_CLUSTER_RETRIES {
                    return Err(format!("{error:?}"));
                }
                std::thread::sleep(SHARED_CLUSTER_RETRY_DELAY);
                attempt += 1;
            }
        }
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_owned()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "cluster bootstrap panicked".to_owned()
    }
}

/// Points `PG_EMBEDDED_WORKER` at this package's `pg_worker` binary so
/// bootstrap works when the tests run as root.
fn ensure_worker_binary() {
    if std::env::var_os("PG_EMBEDDED_WORKER").is_none() {
        // SAFETY: called before the library spawns any threads; see
        // `ensure_stable_password`.
        unsafe {
            std::env::set_var("PG_EMBEDDED_WORKER", env!("CARGO_BIN_EXE_pg_worker"));
        }
    }
}

/// Keeps `PG_PASSWORD` stable so a reused data directory still accepts the
/// password it was initialised with.
fn ensure_stable_password() {
    if std::env::var_os("PG_PASSWORD").is_none() {
        // SAFETY: called before the library spawns any threads; the shared
        // cluster singleton serialises bootstrap within the process.
        unsafe {
            std::env::set_var("PG_PASSWORD", "accounts_embedded_test");
        }
    }
}

/// Creates a uniquely named database on `cluster` with the schema applied.
///
/// The database is dropped when the returned guard goes out of scope.
pub fn provision_database(cluster: &ClusterHandle) -> Result<TemporaryDatabase, String> {
    let name = format!("accounts_test_{}", Uuid::new_v4().simple());
    let database = cluster
        .temporary_database(name.as_str())
        .map_err(|err| format!("create database {name}: {err:?}"))?;
    migrate_schema(database.url())?;
    Ok(database)
}

/// Runs all pending Diesel migrations against the test database.
pub fn migrate_schema(url: &str) -> Result<(), String> {
    let mut conn = PgConnection::establish(url).map_err(|err| format!("connect: {err}"))?;
    conn.run_pending_migrations(MIGRATIONS)
        .map_err(|err| format!("migration: {err}"))?;
    Ok(())
}

/// Drops the `users` table so subsequent statements fail at the store.
pub fn drop_users_table(url: &str) -> Result<(), String> {
    let mut conn = PgConnection::establish(url).map_err(|err| format!("connect: {err}"))?;
    diesel::sql_query("DROP TABLE IF EXISTS users")
        .execute(&mut conn)
        .map_err(|err| format!("drop users: {err}"))?;
    Ok(())
}
