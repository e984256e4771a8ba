//! Share link access evaluation for non-owners.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use folio_core::error::AppError;
use folio_entity::authorized_email::EmailAddress;
use folio_entity::portfolio::{AccessMode, LinkAudienceType, LinkPermission, Portfolio};

use super::registry::AuthorizedEmailRegistry;

/// Why access was granted or denied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessReason {
    /// Access granted.
    Granted,
    /// The portfolio is not in `link` mode.
    LinkDisabled,
    /// The link is restricted to emails and no principal was presented.
    AuthenticationRequired,
    /// The principal's email is not on the allow-list.
    EmailNotAuthorized,
}

impl AccessReason {
    /// Returns the reason as a string slice.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Granted => "granted",
            Self::LinkDisabled => "link_disabled",
            Self::AuthenticationRequired => "authentication_required",
            Self::EmailNotAuthorized => "email_not_authorized",
        }
    }
}

impl fmt::Display for AccessReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of evaluating a link request.
///
/// A permission is present exactly when access is allowed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AccessDecision {
    allowed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    permission: Option<LinkPermission>,
    reason: AccessReason,
}

impl AccessDecision {
    /// Access granted at the given level.
    pub fn granted(permission: LinkPermission) -> Self {
        Self {
            allowed: true,
            permission: Some(permission),
            reason: AccessReason::Granted,
        }
    }

    /// Access denied.
    pub fn denied(reason: AccessReason) -> Self {
        debug_assert!(reason != AccessReason::Granted);
        Self {
            allowed: false,
            permission: None,
            reason,
        }
    }

    /// Whether the request may proceed.
    pub fn allowed(&self) -> bool {
        self.allowed
    }

    /// Granted level; `None` on denial.
    pub fn permission(&self) -> Option<LinkPermission> {
        self.permission
    }

    /// Why the decision came out this way.
    pub fn reason(&self) -> AccessReason {
        self.reason
    }
}

/// Decides whether a non-owner request through a share link is allowed.
///
/// Ownership is checked by the caller; owners never reach this type.
#[derive(Debug, Clone)]
pub struct AccessEvaluator {
    /// Email allow-list.
    registry: Arc<AuthorizedEmailRegistry>,
}

impl AccessEvaluator {
    /// Creates a new evaluator.
    pub fn new(registry: Arc<AuthorizedEmailRegistry>) -> Self {
        Self { registry }
    }

    /// Evaluate `requester` against the portfolio's current sharing state.
    ///
    /// A grant through an `emails_only` link records first access on the
    /// matching allow-list entry.
    pub async fn evaluate(
        &self,
        portfolio: &Portfolio,
        requester: Option<&EmailAddress>,
    ) -> Result<AccessDecision, AppError> {
        if portfolio.access_mode != AccessMode::Link {
            return Ok(AccessDecision::denied(AccessReason::LinkDisabled));
        }

        match portfolio.link_audience_type {
            LinkAudienceType::AnyWithLink => {
                Ok(AccessDecision::granted(portfolio.link_permission))
            }
            LinkAudienceType::EmailsOnly => {
                let Some(email) = requester else {
                    return Ok(AccessDecision::denied(AccessReason::AuthenticationRequired));
                };
                if !self.registry.contains(portfolio.id, email).await? {
                    return Ok(AccessDecision::denied(AccessReason::EmailNotAuthorized));
                }
                self.registry.mark_accessed(portfolio.id, email).await?;
                Ok(AccessDecision::granted(portfolio.link_permission))
            }
        }
    }
}
