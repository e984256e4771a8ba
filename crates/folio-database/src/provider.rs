//! Backend selection for the repository traits.

use std::sync::Arc;

use tracing::info;

use folio_core::config::{DatabaseConfig, DatabaseProvider};
use folio_core::result::AppResult;

use crate::connection::DatabasePool;
use crate::memory::{MemoryAuthorizedEmailRepository, MemoryPortfolioRepository};
use crate::migration::run_migrations;
use crate::repositories::{PgAuthorizedEmailRepository, PgPortfolioRepository};
use crate::traits::{AuthorizedEmailRepository, PortfolioRepository};

/// The repositories the services run against, plus the pool when backed
/// by PostgreSQL.
#[derive(Debug, Clone)]
pub struct Repositories {
    /// Portfolio rows.
    pub portfolios: Arc<dyn PortfolioRepository>,
    /// Email allow-lists.
    pub authorized_emails: Arc<dyn AuthorizedEmailRepository>,
    /// Connection pool, absent for the in-memory provider.
    pub pool: Option<DatabasePool>,
}

impl Repositories {
    /// Open the configured backend, running migrations for PostgreSQL.
    pub async fn open(config: &DatabaseConfig) -> AppResult<Self> {
        match config.provider {
            DatabaseProvider::Postgres => {
                let pool = DatabasePool::connect(config).await?;
                if config.run_migrations {
                    run_migrations(pool.pool()).await?;
                }
                Ok(Self::postgres(pool))
            }
            DatabaseProvider::Memory => {
                info!("Using in-memory store; data will not survive a restart");
                Ok(Self::in_memory())
            }
        }
    }

    /// Repositories backed by an existing PostgreSQL pool.
    pub fn postgres(pool: DatabasePool) -> Self {
        Self {
            portfolios: Arc::new(PgPortfolioRepository::new(pool.pool().clone())),
            authorized_emails: Arc::new(PgAuthorizedEmailRepository::new(pool.pool().clone())),
            pool: Some(pool),
        }
    }

    /// Fresh, empty in-memory repositories.
    pub fn in_memory() -> Self {
        Self {
            portfolios: Arc::new(MemoryPortfolioRepository::new()),
            authorized_emails: Arc::new(MemoryAuthorizedEmailRepository::new()),
            pool: None,
        }
    }

    /// Check that the backend is reachable.
    pub async fn health_check(&self) -> AppResult<bool> {
        match &self.pool {
            Some(pool) => pool.health_check().await,
            None => Ok(true),
        }
    }

    /// Close the pool, if any.
    pub async fn close(&self) {
        if let Some(pool) = &self.pool {
            pool.close().await;
        }
    }
}
