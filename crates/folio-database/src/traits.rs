//! Storage traits implemented by the PostgreSQL and in-memory backends.
//!
//! Services hold these as `Arc<dyn ...>` so the backend is chosen once at
//! startup. Every method that changes sharing state is a single atomic
//! step on one portfolio row.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use folio_core::result::AppResult;
use folio_entity::authorized_email::{AuthorizedEmail, EmailAddress};
use folio_entity::portfolio::{ContentUpdate, Portfolio, SharingUpdate};

/// Persistence for portfolios and their sharing fields.
#[async_trait]
pub trait PortfolioRepository: Send + Sync + 'static {
    /// Insert a new portfolio.
    async fn create(&self, portfolio: &Portfolio) -> AppResult<Portfolio>;

    /// Find a portfolio by ID.
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Portfolio>>;

    /// Find the portfolio holding a share token, regardless of access mode.
    async fn find_by_token(&self, token: &str) -> AppResult<Option<Portfolio>>;

    /// Whether any portfolio holds this token.
    async fn token_exists(&self, token: &str) -> AppResult<bool>;

    /// Store `token` only if the portfolio has none yet.
    ///
    /// Returns the updated row, or `None` when the portfolio is missing or
    /// already holds a token. Fails with `Conflict` if another portfolio
    /// owns the token.
    async fn assign_token_if_absent(
        &self,
        id: Uuid,
        token: &str,
        issued_at: DateTime<Utc>,
    ) -> AppResult<Option<Portfolio>>;

    /// Unconditionally replace the token. Fails with `Conflict` if another
    /// portfolio owns the token.
    async fn replace_token(
        &self,
        id: Uuid,
        token: &str,
        issued_at: DateTime<Utc>,
    ) -> AppResult<Option<Portfolio>>;

    /// Apply a partial update to the mode, permission and audience fields.
    async fn update_sharing(&self, id: Uuid, update: &SharingUpdate)
    -> AppResult<Option<Portfolio>>;

    /// Apply a content-only update.
    async fn update_content(&self, id: Uuid, update: &ContentUpdate)
    -> AppResult<Option<Portfolio>>;
}

/// Persistence for a portfolio's email allow-list.
#[async_trait]
pub trait AuthorizedEmailRepository: Send + Sync + 'static {
    /// Insert the entry unless `(portfolio_id, email)` already exists.
    ///
    /// Returns the stored row and whether this call created it.
    async fn insert_if_absent(&self, entry: &AuthorizedEmail) -> AppResult<(AuthorizedEmail, bool)>;

    /// Find one entry.
    async fn find(&self, portfolio_id: Uuid, email: &EmailAddress)
    -> AppResult<Option<AuthorizedEmail>>;

    /// All entries of a portfolio, oldest invitation first.
    async fn list(&self, portfolio_id: Uuid) -> AppResult<Vec<AuthorizedEmail>>;

    /// Delete one entry. Returns `true` if a row was removed.
    async fn delete(&self, portfolio_id: Uuid, email: &EmailAddress) -> AppResult<bool>;

    /// Set `accessed_at` if it is still null. Returns `true` if this call set it.
    async fn mark_accessed(
        &self,
        portfolio_id: Uuid,
        email: &EmailAddress,
        at: DateTime<Utc>,
    ) -> AppResult<bool>;
}

impl std::fmt::Debug for dyn PortfolioRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("dyn PortfolioRepository")
    }
}

impl std::fmt::Debug for dyn AuthorizedEmailRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("dyn AuthorizedEmailRepository")
    }
}
