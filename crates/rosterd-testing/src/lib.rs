//! Test infrastructure and utilities for deterministic testing.
//!
//! Provides per-test database isolation and fixture builders so
//! integration tests run reproducibly and in parallel. Each [`TestEnv`]
//! owns its own PostgreSQL database with the service schema applied.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

use anyhow::Result;
use sqlx::PgPool;

pub mod database;
pub mod fixtures;

pub use database::TestDatabase;
pub use fixtures::FormBuilder;
pub use rosterd_core::{storage::Storage, Clock, TestClock};

/// Test environment with database isolation for integration testing.
///
/// Provides:
/// - A fresh database per test with the service schema applied
/// - Repository access through the production [`Storage`] type
/// - Query helpers for asserting on stored rows
pub struct TestEnv {
    database: TestDatabase,
    storage: Storage,
}

impl TestEnv {
    /// Creates a new isolated test environment.
    ///
    /// # Errors
    ///
    /// Fails when `DATABASE_URL` is unset or the test database cannot be
    /// created.
    pub async fn new() -> Result<Self> {
        init_test_tracing();

        let database = TestDatabase::create().await?;
        let storage = Storage::new(database.pool().clone());

        Ok(Self { database, storage })
    }

    /// Access to the database pool.
    pub fn pool(&self) -> &PgPool {
        self.database.pool()
    }

    /// Opens a fresh pool to this test's database.
    ///
    /// Useful for verifying persisted state after a test closes the
    /// primary pool to simulate a store outage.
    ///
    /// # Errors
    ///
    /// Fails when the database cannot be reached.
    pub async fn reconnect(&self) -> Result<PgPool> {
        self.database.connect().await
    }

    /// Access to the storage layer.
    pub fn storage(&self) -> &Storage {
        &self.storage
    }

    /// Name of this test's database.
    pub fn database_name(&self) -> &str {
        self.database.database_name()
    }

    /// Counts rows in the `users` table.
    ///
    /// # Errors
    ///
    /// Fails when the query cannot be executed.
    pub async fn row_count(&self) -> Result<i64> {
        Ok(self.storage.users.count().await?)
    }
}

/// Initializes tracing for tests, once per process.
///
/// Quiet by default; set `RUST_LOG` to see output from the code under
/// test.
fn init_test_tracing() {
    use tracing_subscriber::EnvFilter;

    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("error")),
        )
        .with_test_writer()
        .try_init();
}
