//! Persistence for registration rows.

use std::sync::Arc;

use sqlx::PgPool;

use crate::{
    error::Result,
    models::{NewUser, UserId, UserRecord},
};

/// Repository for the `users` table.
pub struct Repository {
    pool: Arc<PgPool>,
}

impl Repository {
    /// Creates a repository over the given pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }

    pub(crate) fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Inserts one registration and returns its assigned id.
    ///
    /// Every call writes a new row; submissions are not deduplicated, so
    /// posting identical data twice stores two rows.
    ///
    /// # Errors
    ///
    /// Returns an error when a connection cannot be acquired or the
    /// statement fails.
    pub async fn create(&self, user: &NewUser) -> Result<UserId> {
        let id = sqlx::query_scalar::<_, UserId>(
            r#"
            INSERT INTO users (inputname, inputage, inputgender, inputcourse, inputemail)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id
            "#,
        )
        .bind(&user.name)
        .bind(&user.age)
        .bind(&user.gender)
        .bind(&user.course)
        .bind(&user.email)
        .fetch_one(&*self.pool)
        .await?;

        Ok(id)
    }

    /// Fetches a stored registration by id.
    ///
    /// # Errors
    ///
    /// Returns an error when the query fails; an absent row is `Ok(None)`.
    pub async fn find_by_id(&self, id: UserId) -> Result<Option<UserRecord>> {
        let record = sqlx::query_as::<_, UserRecord>(
            "SELECT id, inputname, inputage, inputgender, inputcourse, inputemail, created_at
             FROM users
             WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&*self.pool)
        .await?;

        Ok(record)
    }

    /// Counts stored registrations.
    ///
    /// # Errors
    ///
    /// Returns an error when the query fails.
    pub async fn count(&self) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users")
            .fetch_one(&*self.pool)
            .await?;

        Ok(count)
    }
}
