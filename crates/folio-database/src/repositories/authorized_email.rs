//! PostgreSQL authorized email repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use folio_core::error::{AppError, ErrorKind};
use folio_core::result::AppResult;
use folio_entity::authorized_email::{AuthorizedEmail, EmailAddress};

use crate::traits::AuthorizedEmailRepository;

/// Repository for the per-portfolio email allow-list.
#[derive(Debug, Clone)]
pub struct PgAuthorizedEmailRepository {
    pool: PgPool,
}

impl PgAuthorizedEmailRepository {
    /// Create a new authorized email repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AuthorizedEmailRepository for PgAuthorizedEmailRepository {
    async fn insert_if_absent(
        &self,
        entry: &AuthorizedEmail,
    ) -> AppResult<(AuthorizedEmail, bool)> {
        let inserted = sqlx::query_as::<_, AuthorizedEmail>(
            "INSERT INTO authorized_emails (id, portfolio_id, email, invited_by_name, invited_at, accessed_at) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             ON CONFLICT (portfolio_id, email) DO NOTHING RETURNING *",
        )
        .bind(entry.id)
        .bind(entry.portfolio_id)
        .bind(&entry.email)
        .bind(&entry.invited_by_name)
        .bind(entry.invited_at)
        .bind(entry.accessed_at)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::from_sqlx("Failed to insert authorized email", e))?;

        if let Some(row) = inserted {
            return Ok((row, true));
        }

        let existing = sqlx::query_as::<_, AuthorizedEmail>(
            "SELECT * FROM authorized_emails WHERE portfolio_id = $1 AND email = $2",
        )
        .bind(entry.portfolio_id)
        .bind(&entry.email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to load authorized email", e)
        })?
        // The row can vanish between the conflict and the read if it is
        // removed concurrently.
        .ok_or_else(|| AppError::conflict("Authorized email changed concurrently"))?;

        Ok((existing, false))
    }

    async fn find(
        &self,
        portfolio_id: Uuid,
        email: &EmailAddress,
    ) -> AppResult<Option<AuthorizedEmail>> {
        sqlx::query_as::<_, AuthorizedEmail>(
            "SELECT * FROM authorized_emails WHERE portfolio_id = $1 AND email = $2",
        )
        .bind(portfolio_id)
        .bind(email.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find authorized email", e))
    }

    async fn list(&self, portfolio_id: Uuid) -> AppResult<Vec<AuthorizedEmail>> {
        sqlx::query_as::<_, AuthorizedEmail>(
            "SELECT * FROM authorized_emails WHERE portfolio_id = $1 ORDER BY invited_at, email",
        )
        .bind(portfolio_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to list authorized emails", e)
        })
    }

    async fn delete(&self, portfolio_id: Uuid, email: &EmailAddress) -> AppResult<bool> {
        let result =
            sqlx::query("DELETE FROM authorized_emails WHERE portfolio_id = $1 AND email = $2")
                .bind(portfolio_id)
                .bind(email.as_str())
                .execute(&self.pool)
                .await
                .map_err(|e| {
                    AppError::with_source(ErrorKind::Database, "Failed to delete authorized email", e)
                })?;
        Ok(result.rows_affected() > 0)
    }

    async fn mark_accessed(
        &self,
        portfolio_id: Uuid,
        email: &EmailAddress,
        at: DateTime<Utc>,
    ) -> AppResult<bool> {
        let result = sqlx::query(
            "UPDATE authorized_emails SET accessed_at = $3 \
             WHERE portfolio_id = $1 AND email = $2 AND accessed_at IS NULL",
        )
        .bind(portfolio_id)
        .bind(email.as_str())
        .bind(at)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to mark email accessed", e))?;
        Ok(result.rows_affected() > 0)
    }
}
