//! Storage layer for registration data.
//!
//! Repositories own the connection pool behind an `Arc` and expose typed
//! operations. [`Storage`] is the cheap-to-clone container handed to the
//! HTTP layer; handlers never see raw SQL.

pub mod users;

use std::sync::Arc;

use sqlx::PgPool;
use tracing::debug;

use crate::error::Result;

/// Container for all repositories, sharing one connection pool.
#[derive(Clone)]
pub struct Storage {
    /// Registration rows.
    pub users: Arc<users::Repository>,
}

impl Storage {
    /// Builds the repository set over a connection pool.
    pub fn new(pool: PgPool) -> Self {
        let pool = Arc::new(pool);
        Self { users: Arc::new(users::Repository::new(pool)) }
    }

    /// Verifies database connectivity with a trivial query.
    ///
    /// # Errors
    ///
    /// Returns an error when a connection cannot be acquired or the query
    /// fails.
    pub async fn health_check(&self) -> Result<()> {
        sqlx::query("SELECT 1").execute(self.users.pool()).await?;
        Ok(())
    }
}

/// Creates the `users` table if it does not exist.
///
/// The insert path names only the five form columns; `id` and `created_at`
/// are filled by database defaults.
///
/// # Errors
///
/// Returns an error if the DDL cannot be executed.
pub async fn ensure_schema(pool: &PgPool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id BIGSERIAL PRIMARY KEY,
            inputname TEXT NOT NULL,
            inputage TEXT NOT NULL,
            inputgender TEXT NOT NULL,
            inputcourse TEXT NOT NULL,
            inputemail TEXT NOT NULL,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
    )
    .execute(pool)
    .await?;

    debug!("users table ready");
    Ok(())
}
