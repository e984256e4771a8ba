//! Per-portfolio email allow-list.

use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use tracing::{debug, info};
use uuid::Uuid;

use folio_core::error::AppError;
use folio_database::AuthorizedEmailRepository;
use folio_entity::authorized_email::{AuthorizedEmail, EmailAddress};

/// Longest accepted `invited_by_name`.
const MAX_INVITER_NAME_LEN: usize = 255;

/// Outcome of adding an address to the allow-list.
#[derive(Debug, Clone, Serialize)]
pub struct Registration {
    /// The stored entry, new or pre-existing.
    pub entry: AuthorizedEmail,
    /// Whether this call created the entry.
    pub created: bool,
}

/// Manages the authorized emails of `emails_only` links.
///
/// Entries are keyed by normalized address, so membership is
/// case-insensitive and an address appears at most once per portfolio.
#[derive(Debug, Clone)]
pub struct AuthorizedEmailRegistry {
    /// Authorized email repository.
    emails: Arc<dyn AuthorizedEmailRepository>,
}

impl AuthorizedEmailRegistry {
    /// Creates a new registry.
    pub fn new(emails: Arc<dyn AuthorizedEmailRepository>) -> Self {
        Self { emails }
    }

    /// Add an address. Adding one that is already present returns the
    /// existing entry unchanged.
    pub async fn add(
        &self,
        portfolio_id: Uuid,
        raw_email: &str,
        invited_by_name: &str,
    ) -> Result<Registration, AppError> {
        let email = EmailAddress::parse(raw_email)?;
        let inviter = invited_by_name.trim();
        if inviter.is_empty() {
            return Err(AppError::validation("invited_by_name is required"));
        }
        if inviter.chars().count() > MAX_INVITER_NAME_LEN {
            return Err(AppError::validation(format!(
                "invited_by_name must be at most {MAX_INVITER_NAME_LEN} characters"
            )));
        }

        let entry = AuthorizedEmail::new(portfolio_id, &email, inviter.to_string());
        let (entry, created) = self.emails.insert_if_absent(&entry).await?;

        if created {
            info!(%portfolio_id, email = %email, "Authorized email added");
        } else {
            debug!(%portfolio_id, email = %email, "Authorized email already present");
        }

        Ok(Registration { entry, created })
    }

    /// Remove an address. Removing one that is not listed is not an error.
    pub async fn remove(&self, portfolio_id: Uuid, raw_email: &str) -> Result<bool, AppError> {
        // A malformed address can never have been stored.
        let Ok(email) = EmailAddress::parse(raw_email) else {
            debug!(%portfolio_id, "Ignoring removal of malformed email");
            return Ok(false);
        };

        let removed = self.emails.delete(portfolio_id, &email).await?;
        if removed {
            info!(%portfolio_id, email = %email, "Authorized email removed");
        }
        Ok(removed)
    }

    /// Record the first successful access through the link. Later calls
    /// leave the original timestamp in place.
    pub async fn mark_accessed(
        &self,
        portfolio_id: Uuid,
        email: &EmailAddress,
    ) -> Result<bool, AppError> {
        let first = self
            .emails
            .mark_accessed(portfolio_id, email, Utc::now())
            .await?;
        if first {
            info!(%portfolio_id, email = %email, "Authorized email used the link for the first time");
        }
        Ok(first)
    }

    /// Whether the address is on the list.
    pub async fn contains(
        &self,
        portfolio_id: Uuid,
        email: &EmailAddress,
    ) -> Result<bool, AppError> {
        Ok(self.emails.find(portfolio_id, email).await?.is_some())
    }

    /// All entries, oldest invitation first.
    pub async fn list(&self, portfolio_id: Uuid) -> Result<Vec<AuthorizedEmail>, AppError> {
        self.emails.list(portfolio_id).await
    }
}

#[cfg(test)]
mod tests {
    use folio_core::error::ErrorKind;
    use folio_database::Repositories;

    use super::*;

    fn registry() -> AuthorizedEmailRegistry {
        AuthorizedEmailRegistry::new(Repositories::in_memory().authorized_emails)
    }

    fn email(raw: &str) -> EmailAddress {
        EmailAddress::parse(raw).unwrap()
    }

    #[tokio::test]
    async fn test_add_is_case_insensitive_and_idempotent() {
        let registry = registry();
        let portfolio_id = Uuid::new_v4();

        let first = registry
            .add(portfolio_id, "Ada@Example.com", "Owner")
            .await
            .unwrap();
        assert!(first.created);
        assert_eq!(first.entry.email, "ada@example.com");

        let second = registry
            .add(portfolio_id, "  ada@EXAMPLE.com ", "Someone else")
            .await
            .unwrap();
        assert!(!second.created);
        assert_eq!(second.entry.id, first.entry.id);
        assert_eq!(second.entry.invited_by_name, "Owner");

        assert_eq!(registry.list(portfolio_id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_add_rejects_bad_input() {
        let registry = registry();
        let portfolio_id = Uuid::new_v4();

        let err = registry
            .add(portfolio_id, "not-an-email", "Owner")
            .await
            .unwrap_err();
        assert!(err.is(ErrorKind::Validation));

        let err = registry
            .add(portfolio_id, "ada@example.com", "   ")
            .await
            .unwrap_err();
        assert!(err.is(ErrorKind::Validation));

        let long_name = "x".repeat(MAX_INVITER_NAME_LEN + 1);
        let err = registry
            .add(portfolio_id, "ada@example.com", &long_name)
            .await
            .unwrap_err();
        assert!(err.is(ErrorKind::Validation));
    }

    #[tokio::test]
    async fn test_lists_are_per_portfolio() {
        let registry = registry();
        let first = Uuid::new_v4();
        let second = Uuid::new_v4();

        registry.add(first, "ada@example.com", "Owner").await.unwrap();

        assert!(registry.contains(first, &email("ADA@example.com")).await.unwrap());
        assert!(!registry.contains(second, &email("ada@example.com")).await.unwrap());
    }

    #[tokio::test]
    async fn test_remove_missing_is_not_an_error() {
        let registry = registry();
        let portfolio_id = Uuid::new_v4();

        assert!(!registry.remove(portfolio_id, "ghost@example.com").await.unwrap());
        assert!(!registry.remove(portfolio_id, "garbage").await.unwrap());

        registry.add(portfolio_id, "ada@example.com", "Owner").await.unwrap();
        assert!(registry.remove(portfolio_id, "ADA@example.com").await.unwrap());
        assert!(registry.list(portfolio_id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_mark_accessed_keeps_first_timestamp() {
        let registry = registry();
        let portfolio_id = Uuid::new_v4();
        let ada = email("ada@example.com");

        registry.add(portfolio_id, ada.as_str(), "Owner").await.unwrap();
        assert!(registry.mark_accessed(portfolio_id, &ada).await.unwrap());

        let first = registry.list(portfolio_id).await.unwrap()[0].accessed_at;
        assert!(first.is_some());

        assert!(!registry.mark_accessed(portfolio_id, &ada).await.unwrap());
        let again = registry.list(portfolio_id).await.unwrap()[0].accessed_at;
        assert_eq!(first, again);
    }
}
