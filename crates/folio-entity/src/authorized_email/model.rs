//! Authorized email entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::address::EmailAddress;

/// An email permitted to open a portfolio's `emails_only` share link.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AuthorizedEmail {
    /// Row identifier.
    pub id: Uuid,
    /// The portfolio this entry belongs to.
    pub portfolio_id: Uuid,
    /// Normalized (trimmed, lowercased) address.
    pub email: String,
    /// Display label of whoever added the entry. Not an identity.
    pub invited_by_name: String,
    /// When the entry was added.
    pub invited_at: DateTime<Utc>,
    /// First successful access through the link; written once.
    pub accessed_at: Option<DateTime<Utc>>,
}

impl AuthorizedEmail {
    /// Build a fresh, never-accessed entry.
    pub fn new(portfolio_id: Uuid, email: &EmailAddress, invited_by_name: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            portfolio_id,
            email: email.as_str().to_string(),
            invited_by_name,
            invited_at: Utc::now(),
            accessed_at: None,
        }
    }
}
