//! In-memory authorized email repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use uuid::Uuid;

use folio_core::result::AppResult;
use folio_entity::authorized_email::{AuthorizedEmail, EmailAddress};

use crate::traits::AuthorizedEmailRepository;

/// Allow-list keyed by `(portfolio_id, normalized email)`.
#[derive(Debug, Default)]
pub struct MemoryAuthorizedEmailRepository {
    entries: DashMap<(Uuid, String), AuthorizedEmail>,
}

impl MemoryAuthorizedEmailRepository {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AuthorizedEmailRepository for MemoryAuthorizedEmailRepository {
    async fn insert_if_absent(
        &self,
        entry: &AuthorizedEmail,
    ) -> AppResult<(AuthorizedEmail, bool)> {
        match self.entries.entry((entry.portfolio_id, entry.email.clone())) {
            Entry::Occupied(existing) => Ok((existing.get().clone(), false)),
            Entry::Vacant(slot) => {
                slot.insert(entry.clone());
                Ok((entry.clone(), true))
            }
        }
    }

    async fn find(
        &self,
        portfolio_id: Uuid,
        email: &EmailAddress,
    ) -> AppResult<Option<AuthorizedEmail>> {
        Ok(self
            .entries
            .get(&(portfolio_id, email.as_str().to_string()))
            .map(|e| e.value().clone()))
    }

    async fn list(&self, portfolio_id: Uuid) -> AppResult<Vec<AuthorizedEmail>> {
        let mut entries: Vec<AuthorizedEmail> = self
            .entries
            .iter()
            .filter(|e| e.key().0 == portfolio_id)
            .map(|e| e.value().clone())
            .collect();
        entries.sort_by(|a, b| {
            a.invited_at
                .cmp(&b.invited_at)
                .then_with(|| a.email.cmp(&b.email))
        });
        Ok(entries)
    }

    async fn delete(&self, portfolio_id: Uuid, email: &EmailAddress) -> AppResult<bool> {
        Ok(self
            .entries
            .remove(&(portfolio_id, email.as_str().to_string()))
            .is_some())
    }

    async fn mark_accessed(
        &self,
        portfolio_id: Uuid,
        email: &EmailAddress,
        at: DateTime<Utc>,
    ) -> AppResult<bool> {
        match self
            .entries
            .get_mut(&(portfolio_id, email.as_str().to_string()))
        {
            Some(mut entry) if entry.accessed_at.is_none() => {
                entry.accessed_at = Some(at);
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}
