//! PostgreSQL portfolio repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use folio_core::error::{AppError, ErrorKind};
use folio_core::result::AppResult;
use folio_entity::portfolio::{ContentUpdate, Portfolio, SharingUpdate};

use crate::traits::PortfolioRepository;

/// Repository for portfolio rows and token lookups.
#[derive(Debug, Clone)]
pub struct PgPortfolioRepository {
    pool: PgPool,
}

impl PgPortfolioRepository {
    /// Create a new portfolio repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PortfolioRepository for PgPortfolioRepository {
    async fn create(&self, portfolio: &Portfolio) -> AppResult<Portfolio> {
        sqlx::query_as::<_, Portfolio>(
            "INSERT INTO portfolios (id, owner_id, title, content, access_mode, link_permission, \
             link_audience_type, share_token, link_created_at, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11) RETURNING *",
        )
        .bind(portfolio.id)
        .bind(portfolio.owner_id)
        .bind(&portfolio.title)
        .bind(&portfolio.content)
        .bind(portfolio.access_mode)
        .bind(portfolio.link_permission)
        .bind(portfolio.link_audience_type)
        .bind(&portfolio.share_token)
        .bind(portfolio.link_created_at)
        .bind(portfolio.created_at)
        .bind(portfolio.updated_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::from_sqlx("Failed to create portfolio", e))
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Portfolio>> {
        sqlx::query_as::<_, Portfolio>("SELECT * FROM portfolios WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find portfolio", e))
    }

    async fn find_by_token(&self, token: &str) -> AppResult<Option<Portfolio>> {
        sqlx::query_as::<_, Portfolio>("SELECT * FROM portfolios WHERE share_token = $1")
            .bind(token)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find portfolio by token", e)
            })
    }

    async fn token_exists(&self, token: &str) -> AppResult<bool> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM portfolios WHERE share_token = $1)",
        )
        .bind(token)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to check share token", e))
    }

    async fn assign_token_if_absent(
        &self,
        id: Uuid,
        token: &str,
        issued_at: DateTime<Utc>,
    ) -> AppResult<Option<Portfolio>> {
        sqlx::query_as::<_, Portfolio>(
            "UPDATE portfolios SET share_token = $2, link_created_at = $3, updated_at = NOW() \
             WHERE id = $1 AND share_token IS NULL RETURNING *",
        )
        .bind(id)
        .bind(token)
        .bind(issued_at)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::from_sqlx("Failed to assign share token", e))
    }

    async fn replace_token(
        &self,
        id: Uuid,
        token: &str,
        issued_at: DateTime<Utc>,
    ) -> AppResult<Option<Portfolio>> {
        sqlx::query_as::<_, Portfolio>(
            "UPDATE portfolios SET share_token = $2, link_created_at = $3, updated_at = NOW() \
             WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(token)
        .bind(issued_at)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::from_sqlx("Failed to replace share token", e))
    }

    async fn update_sharing(
        &self,
        id: Uuid,
        update: &SharingUpdate,
    ) -> AppResult<Option<Portfolio>> {
        sqlx::query_as::<_, Portfolio>(
            "UPDATE portfolios SET \
             access_mode = COALESCE($2, access_mode), \
             link_permission = COALESCE($3, link_permission), \
             link_audience_type = COALESCE($4, link_audience_type), \
             updated_at = NOW() \
             WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(update.access_mode)
        .bind(update.link_permission)
        .bind(update.link_audience_type)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to update sharing", e))
    }

    async fn update_content(
        &self,
        id: Uuid,
        update: &ContentUpdate,
    ) -> AppResult<Option<Portfolio>> {
        sqlx::query_as::<_, Portfolio>(
            "UPDATE portfolios SET \
             title = COALESCE($2, title), \
             content = COALESCE($3, content), \
             updated_at = NOW() \
             WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(&update.title)
        .bind(&update.content)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to update content", e))
    }
}
