//! Portfolio entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::sharing::{AccessMode, LinkAudienceType, LinkPermission};

/// A user's portfolio together with its sharing state.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Portfolio {
    /// Unique portfolio identifier.
    pub id: Uuid,
    /// The only principal allowed to change sharing.
    pub owner_id: Uuid,
    /// Display title.
    pub title: String,
    /// Editor content as submitted by the form-driven editor.
    pub content: serde_json::Value,
    /// Authoritative gate for non-owner access.
    pub access_mode: AccessMode,
    /// Effective only while `access_mode` is `link`.
    pub link_permission: LinkPermission,
    /// Effective only while `access_mode` is `link`.
    pub link_audience_type: LinkAudienceType,
    /// Share token; unique across all portfolios.
    pub share_token: Option<String>,
    /// When the current token was issued.
    pub link_created_at: Option<DateTime<Utc>>,
    /// When the portfolio was created.
    pub created_at: DateTime<Utc>,
    /// When the portfolio was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Portfolio {
    /// Build a portfolio with the default sharing state.
    pub fn new(data: CreatePortfolio) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            owner_id: data.owner_id,
            title: data.title,
            content: data.content,
            access_mode: AccessMode::default(),
            link_permission: LinkPermission::default(),
            link_audience_type: LinkAudienceType::default(),
            share_token: None,
            link_created_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Check whether the given user owns this portfolio.
    pub fn is_owned_by(&self, user_id: Uuid) -> bool {
        self.owner_id == user_id
    }

    /// A link is active when the mode allows it and a token exists.
    pub fn has_active_link(&self) -> bool {
        self.access_mode == AccessMode::Link && self.share_token.is_some()
    }
}

/// Data required to create a new portfolio.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePortfolio {
    /// Owner of the new portfolio.
    pub owner_id: Uuid,
    /// Display title.
    pub title: String,
    /// Initial editor content.
    #[serde(default = "empty_content")]
    pub content: serde_json::Value,
}

/// Changes to the sharing fields. `None` leaves a field untouched.
///
/// The token is not part of this struct; it only changes through the
/// dedicated compare-and-set operations of the repository.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SharingUpdate {
    /// New access mode.
    pub access_mode: Option<AccessMode>,
    /// New link permission.
    pub link_permission: Option<LinkPermission>,
    /// New audience type.
    pub link_audience_type: Option<LinkAudienceType>,
}

impl SharingUpdate {
    /// Apply the update to an in-memory portfolio.
    pub fn apply(&self, portfolio: &mut Portfolio) {
        if let Some(mode) = self.access_mode {
            portfolio.access_mode = mode;
        }
        if let Some(permission) = self.link_permission {
            portfolio.link_permission = permission;
        }
        if let Some(audience) = self.link_audience_type {
            portfolio.link_audience_type = audience;
        }
    }
}

/// Changes a link editor may make. Sharing fields are deliberately absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContentUpdate {
    /// New title.
    pub title: Option<String>,
    /// Replacement editor content.
    pub content: Option<serde_json::Value>,
}

impl ContentUpdate {
    /// Whether the update changes nothing.
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.content.is_none()
    }

    /// Apply the update to an in-memory portfolio.
    pub fn apply(&self, portfolio: &mut Portfolio) {
        if let Some(title) = &self.title {
            portfolio.title = title.clone();
        }
        if let Some(content) = &self.content {
            portfolio.content = content.clone();
        }
    }
}

fn empty_content() -> serde_json::Value {
    serde_json::Value::Object(serde_json::Map::new())
}
