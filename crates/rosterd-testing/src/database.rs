//! Database management for deterministic testing.
//!
//! Creates an isolated PostgreSQL database per test so inserts never leak
//! between tests, and drops it again when the [`TestDatabase`] goes out of
//! scope. Optimized for nextest's process-per-test model.

use std::time::Duration;

use anyhow::{Context, Result};
use sqlx::{
    postgres::{PgConnectOptions, PgPoolOptions},
    PgPool,
};
use tokio::sync::Semaphore;
use tracing::{debug, info, warn};
use uuid::Uuid;

// Singleton pool for database management operations
static ADMIN_POOL: tokio::sync::OnceCell<PgPool> = tokio::sync::OnceCell::const_new();

// Semaphore to limit concurrent database creation operations
static DB_CREATION_SEMAPHORE: Semaphore = Semaphore::const_new(3);

/// Isolated test database with its own PostgreSQL database.
///
/// Dropping the value schedules the database itself for removal, so test
/// databases do not accumulate across runs.
#[derive(Debug)]
pub struct TestDatabase {
    pool: PgPool,
    database_name: String,
}

impl TestDatabase {
    /// Creates a fresh database with the service schema applied.
    ///
    /// Connection parameters come from `DATABASE_URL`; the database name in
    /// the URL is ignored and replaced with a unique per-test name.
    ///
    /// # Errors
    ///
    /// Fails when `DATABASE_URL` is unset, the server is unreachable, or
    /// the database cannot be created.
    pub async fn create() -> Result<Self> {
        let admin_pool = create_admin_pool().await?;

        let timestamp = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs();
        let database_name = format!("rosterd_test_{}_{}", timestamp, Uuid::new_v4().simple());

        create_database(&admin_pool, &database_name).await?;

        let pool = create_database_pool(&database_name).await?;
        rosterd_core::storage::ensure_schema(&pool)
            .await
            .context("failed to apply schema to test database")?;

        info!("created isolated test database: {}", database_name);

        Ok(Self { pool, database_name })
    }

    /// Access to the database pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Get the database name.
    pub fn database_name(&self) -> &str {
        &self.database_name
    }

    /// Opens an additional pool to this database.
    ///
    /// Lets a test verify persisted state after closing the primary pool.
    ///
    /// # Errors
    ///
    /// Fails when the database cannot be reached.
    pub async fn connect(&self) -> Result<PgPool> {
        create_database_pool(&self.database_name).await
    }
}

impl Drop for TestDatabase {
    fn drop(&mut self) {
        let database_name = self.database_name.clone();

        // Cleanup needs the runtime; skip when dropped outside one.
        if let Ok(handle) = tokio::runtime::Handle::try_current() {
            handle.spawn(async move {
                if let Err(e) = drop_database(&database_name).await {
                    warn!("failed to drop test database {}: {}", database_name, e);
                }
            });
        }
    }
}

/// Drops a test database, terminating its remaining sessions first.
async fn drop_database(database_name: &str) -> Result<()> {
    let admin_pool = create_admin_pool().await?;

    // Open sessions would block the drop
    let _ = sqlx::query(&format!(
        "SELECT pg_terminate_backend(pid) FROM pg_stat_activity \
         WHERE datname = '{database_name}' AND pid <> pg_backend_pid()"
    ))
    .execute(&admin_pool)
    .await;

    sqlx::query(&format!("DROP DATABASE IF EXISTS \"{database_name}\""))
        .execute(&admin_pool)
        .await
        .with_context(|| format!("failed to drop database {database_name}"))?;

    debug!("dropped test database {}", database_name);
    Ok(())
}

/// Creates an empty database, limiting concurrent creations.
async fn create_database(admin_pool: &PgPool, database_name: &str) -> Result<()> {
    let _permit =
        DB_CREATION_SEMAPHORE.acquire().await.context("database creation semaphore closed")?;

    debug!("creating database {}", database_name);

    sqlx::query(&format!("CREATE DATABASE \"{database_name}\""))
        .execute(admin_pool)
        .await
        .with_context(|| format!("failed to create database {database_name}"))?;

    Ok(())
}

/// Create or reuse the admin connection pool for database management.
async fn create_admin_pool() -> Result<PgPool> {
    if let Some(pool) = ADMIN_POOL.get() {
        if !pool.is_closed() {
            return Ok(pool.clone());
        }
    }

    // Atomic initialization, only one task creates the pool
    let pool = ADMIN_POOL
        .get_or_try_init(|| async {
            let opts = connect_options()?.database("postgres");

            let pool = PgPoolOptions::new()
                .max_connections(2)
                .min_connections(0)
                .max_lifetime(Duration::from_secs(300))
                .acquire_timeout(Duration::from_secs(3))
                .connect_with(opts)
                .await
                .context("failed to connect to admin database")?;

            anyhow::Ok(pool)
        })
        .await?;

    Ok(pool.clone())
}

/// Create a connection pool for a specific database.
async fn create_database_pool(database_name: &str) -> Result<PgPool> {
    let opts = connect_options()?.database(database_name);

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .min_connections(1)
        .acquire_timeout(Duration::from_secs(5))
        .connect_with(opts)
        .await
        .with_context(|| format!("failed to connect to test database {database_name}"))?;

    Ok(pool)
}

fn connect_options() -> Result<PgConnectOptions> {
    let database_url =
        std::env::var("DATABASE_URL").context("DATABASE_URL environment variable is required")?;

    database_url.parse::<PgConnectOptions>().context("failed to parse DATABASE_URL")
}
