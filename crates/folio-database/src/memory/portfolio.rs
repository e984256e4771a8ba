//! In-memory portfolio repository.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use folio_core::error::AppError;
use folio_core::result::AppResult;
use folio_entity::portfolio::{ContentUpdate, Portfolio, SharingUpdate};

use crate::traits::PortfolioRepository;

#[derive(Debug, Default)]
struct Tables {
    portfolios: HashMap<Uuid, Portfolio>,
    /// Stands in for the UNIQUE constraint on `share_token`.
    tokens: HashMap<String, Uuid>,
}

impl Tables {
    fn ensure_token_free(&self, token: &str, id: Uuid) -> AppResult<()> {
        match self.tokens.get(token) {
            Some(holder) if *holder != id => {
                Err(AppError::conflict("Share token already in use"))
            }
            _ => Ok(()),
        }
    }

    fn set_token(&mut self, id: Uuid, token: &str, issued_at: DateTime<Utc>) -> Option<Portfolio> {
        let portfolio = self.portfolios.get_mut(&id)?;
        let previous = portfolio.share_token.replace(token.to_string());
        portfolio.link_created_at = Some(issued_at);
        portfolio.updated_at = Utc::now();
        let updated = portfolio.clone();

        if let Some(old) = previous {
            self.tokens.remove(&old);
        }
        self.tokens.insert(token.to_string(), id);
        Some(updated)
    }
}

/// Portfolio store guarded by a single lock.
#[derive(Debug, Default)]
pub struct MemoryPortfolioRepository {
    tables: RwLock<Tables>,
}

impl MemoryPortfolioRepository {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PortfolioRepository for MemoryPortfolioRepository {
    async fn create(&self, portfolio: &Portfolio) -> AppResult<Portfolio> {
        let mut tables = self.tables.write().await;
        if tables.portfolios.contains_key(&portfolio.id) {
            return Err(AppError::conflict("Portfolio already exists"));
        }
        if let Some(token) = &portfolio.share_token {
            tables.ensure_token_free(token, portfolio.id)?;
            tables.tokens.insert(token.clone(), portfolio.id);
        }
        tables.portfolios.insert(portfolio.id, portfolio.clone());
        Ok(portfolio.clone())
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Portfolio>> {
        Ok(self.tables.read().await.portfolios.get(&id).cloned())
    }

    async fn find_by_token(&self, token: &str) -> AppResult<Option<Portfolio>> {
        let tables = self.tables.read().await;
        Ok(tables
            .tokens
            .get(token)
            .and_then(|id| tables.portfolios.get(id))
            .cloned())
    }

    async fn token_exists(&self, token: &str) -> AppResult<bool> {
        Ok(self.tables.read().await.tokens.contains_key(token))
    }

    async fn assign_token_if_absent(
        &self,
        id: Uuid,
        token: &str,
        issued_at: DateTime<Utc>,
    ) -> AppResult<Option<Portfolio>> {
        let mut tables = self.tables.write().await;
        match tables.portfolios.get(&id) {
            Some(p) if p.share_token.is_none() => {}
            _ => return Ok(None),
        }
        tables.ensure_token_free(token, id)?;
        Ok(tables.set_token(id, token, issued_at))
    }

    async fn replace_token(
        &self,
        id: Uuid,
        token: &str,
        issued_at: DateTime<Utc>,
    ) -> AppResult<Option<Portfolio>> {
        let mut tables = self.tables.write().await;
        if !tables.portfolios.contains_key(&id) {
            return Ok(None);
        }
        tables.ensure_token_free(token, id)?;
        Ok(tables.set_token(id, token, issued_at))
    }

    async fn update_sharing(
        &self,
        id: Uuid,
        update: &SharingUpdate,
    ) -> AppResult<Option<Portfolio>> {
        let mut tables = self.tables.write().await;
        Ok(tables.portfolios.get_mut(&id).map(|portfolio| {
            update.apply(portfolio);
            portfolio.updated_at = Utc::now();
            portfolio.clone()
        }))
    }

    async fn update_content(
        &self,
        id: Uuid,
        update: &ContentUpdate,
    ) -> AppResult<Option<Portfolio>> {
        let mut tables = self.tables.write().await;
        Ok(tables.portfolios.get_mut(&id).map(|portfolio| {
            update.apply(portfolio);
            portfolio.updated_at = Utc::now();
            portfolio.clone()
        }))
    }
}
