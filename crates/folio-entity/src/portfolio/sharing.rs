//! Sharing mode enumerations.
//!
//! Each dimension is a closed enum so a portfolio can never hold an
//! "enabled but unset" combination.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use folio_core::AppError;

/// Whether anyone besides the owner may reach the portfolio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "access_mode", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum AccessMode {
    /// Only the owner.
    #[default]
    OwnerOnly,
    /// Holders of the share link, subject to audience and permission.
    Link,
}

/// What a link holder may do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "link_permission", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum LinkPermission {
    /// Read-only.
    #[default]
    View,
    /// Read and edit content.
    ViewEdit,
}

/// Who may use the share link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "link_audience_type", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum LinkAudienceType {
    /// Anyone holding the link.
    #[default]
    AnyWithLink,
    /// Only signed-in users whose email is on the allow-list.
    EmailsOnly,
}

impl AccessMode {
    /// Return the mode as a snake_case string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OwnerOnly => "owner_only",
            Self::Link => "link",
        }
    }
}

impl LinkPermission {
    /// Whether this permission allows content edits.
    pub fn can_edit(&self) -> bool {
        matches!(self, Self::ViewEdit)
    }

    /// Return the permission as a snake_case string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::View => "view",
            Self::ViewEdit => "view_edit",
        }
    }
}

impl LinkAudienceType {
    /// Return the audience as a snake_case string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AnyWithLink => "any_with_link",
            Self::EmailsOnly => "emails_only",
        }
    }
}

impl fmt::Display for AccessMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl fmt::Display for LinkPermission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl fmt::Display for LinkAudienceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for AccessMode {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "owner_only" => Ok(Self::OwnerOnly),
            "link" => Ok(Self::Link),
            _ => Err(AppError::validation(format!(
                "Invalid access mode: '{s}'. Expected one of: owner_only, link"
            ))),
        }
    }
}

impl FromStr for LinkPermission {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "view" => Ok(Self::View),
            "view_edit" => Ok(Self::ViewEdit),
            _ => Err(AppError::validation(format!(
                "Invalid link permission: '{s}'. Expected one of: view, view_edit"
            ))),
        }
    }
}

impl FromStr for LinkAudienceType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "any_with_link" => Ok(Self::AnyWithLink),
            "emails_only" => Ok(Self::EmailsOnly),
            _ => Err(AppError::validation(format!(
                "Invalid audience type: '{s}'. Expected one of: any_with_link, emails_only"
            ))),
        }
    }
}
