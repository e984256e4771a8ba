//! Link configuration state transitions.
//!
//! Callers have already verified ownership. Every transition here is a
//! single repository write, so concurrent requests never observe a
//! half-applied configuration.

use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use folio_core::error::{AppError, ErrorKind};
use folio_database::PortfolioRepository;
use folio_entity::portfolio::{
    AccessMode, LinkAudienceType, LinkPermission, Portfolio, SharingUpdate,
};

use super::token::{TokenGenerator, token_hint};

/// Full sharing configuration submitted in one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SharingConfigRequest {
    /// Target access mode.
    pub access_mode: AccessMode,
    /// Required when `access_mode` is `link`.
    pub link_permission: Option<LinkPermission>,
    /// Required when `access_mode` is `link`.
    pub link_audience_type: Option<LinkAudienceType>,
}

/// Applies owner-initiated changes to a portfolio's link settings.
#[derive(Debug, Clone)]
pub struct SharingConfiguration {
    /// Portfolio repository.
    portfolios: Arc<dyn PortfolioRepository>,
    /// Token generator.
    tokens: Arc<TokenGenerator>,
}

impl SharingConfiguration {
    /// Creates a new configuration service.
    pub fn new(portfolios: Arc<dyn PortfolioRepository>, tokens: Arc<TokenGenerator>) -> Self {
        Self { portfolios, tokens }
    }

    /// Ensure a token exists and switch the portfolio to `link` mode.
    ///
    /// An existing token is kept, so calling this twice hands out the same
    /// URL. Permission and audience are left as they are.
    pub async fn generate_link(&self, portfolio: &Portfolio) -> Result<Portfolio, AppError> {
        let current = self.ensure_token(portfolio).await?;
        if current.access_mode == AccessMode::Link {
            return Ok(current);
        }

        let update = SharingUpdate {
            access_mode: Some(AccessMode::Link),
            ..SharingUpdate::default()
        };
        let updated = self.write(current.id, &update).await?;
        info!(portfolio_id = %updated.id, "Share link enabled");
        Ok(updated)
    }

    /// Replace the token with a fresh one. The old URL stops resolving.
    ///
    /// Mode, permission and audience are left as they are.
    pub async fn rotate_link(&self, portfolio: &Portfolio) -> Result<Portfolio, AppError> {
        for attempt in 1..=self.tokens.max_attempts() {
            let token = self.tokens.generate_unique().await?;
            match self
                .portfolios
                .replace_token(portfolio.id, &token, Utc::now())
                .await
            {
                Ok(Some(updated)) => {
                    info!(
                        portfolio_id = %updated.id,
                        token = token_hint(&token),
                        "Share token rotated"
                    );
                    return Ok(updated);
                }
                Ok(None) => return Err(AppError::not_found("Portfolio not found")),
                Err(e) if e.is(ErrorKind::Conflict) => {
                    warn!(attempt, portfolio_id = %portfolio.id, "Share token collided on write, retrying");
                }
                Err(e) => return Err(e),
            }
        }

        Err(self.exhausted())
    }

    /// Switch to `owner_only`. The token stays so a later re-enable reuses it.
    pub async fn disable_link(&self, portfolio: &Portfolio) -> Result<Portfolio, AppError> {
        let update = SharingUpdate {
            access_mode: Some(AccessMode::OwnerOnly),
            ..SharingUpdate::default()
        };
        let updated = self.write(portfolio.id, &update).await?;
        info!(portfolio_id = %updated.id, "Share link disabled");
        Ok(updated)
    }

    /// Change only the permission granted through the link.
    pub async fn set_link_permission(
        &self,
        portfolio: &Portfolio,
        permission: LinkPermission,
    ) -> Result<Portfolio, AppError> {
        let update = SharingUpdate {
            link_permission: Some(permission),
            ..SharingUpdate::default()
        };
        let updated = self.write(portfolio.id, &update).await?;
        info!(portfolio_id = %updated.id, %permission, "Link permission updated");
        Ok(updated)
    }

    /// Change only who may use the link.
    pub async fn set_link_audience_type(
        &self,
        portfolio: &Portfolio,
        audience: LinkAudienceType,
    ) -> Result<Portfolio, AppError> {
        let update = SharingUpdate {
            link_audience_type: Some(audience),
            ..SharingUpdate::default()
        };
        let updated = self.write(portfolio.id, &update).await?;
        info!(portfolio_id = %updated.id, %audience, "Link audience updated");
        Ok(updated)
    }

    /// Apply a complete configuration.
    ///
    /// `owner_only` behaves like [`Self::disable_link`] and ignores the other
    /// fields. `link` requires both permission and audience and ensures a
    /// token exists before the three fields are written together.
    pub async fn update_full_config(
        &self,
        portfolio: &Portfolio,
        request: SharingConfigRequest,
    ) -> Result<Portfolio, AppError> {
        match request.access_mode {
            AccessMode::OwnerOnly => self.disable_link(portfolio).await,
            AccessMode::Link => {
                let (Some(permission), Some(audience)) =
                    (request.link_permission, request.link_audience_type)
                else {
                    return Err(AppError::validation(
                        "link_permission and link_audience_type are required when access_mode is link",
                    ));
                };

                let current = self.ensure_token(portfolio).await?;
                let update = SharingUpdate {
                    access_mode: Some(AccessMode::Link),
                    link_permission: Some(permission),
                    link_audience_type: Some(audience),
                };
                let updated = self.write(current.id, &update).await?;
                info!(
                    portfolio_id = %updated.id,
                    %permission,
                    %audience,
                    "Sharing configuration updated"
                );
                Ok(updated)
            }
        }
    }

    /// Return the portfolio with a token, issuing one if it has none.
    async fn ensure_token(&self, portfolio: &Portfolio) -> Result<Portfolio, AppError> {
        if portfolio.share_token.is_some() {
            return Ok(portfolio.clone());
        }

        for attempt in 1..=self.tokens.max_attempts() {
            let token = self.tokens.generate_unique().await?;
            match self
                .portfolios
                .assign_token_if_absent(portfolio.id, &token, Utc::now())
                .await
            {
                Ok(Some(updated)) => {
                    info!(
                        portfolio_id = %updated.id,
                        token = token_hint(&token),
                        "Share token issued"
                    );
                    return Ok(updated);
                }
                Ok(None) => {
                    // A concurrent request may have issued the token first.
                    let current = self
                        .portfolios
                        .find_by_id(portfolio.id)
                        .await?
                        .ok_or_else(|| AppError::not_found("Portfolio not found"))?;
                    if current.share_token.is_some() {
                        return Ok(current);
                    }
                }
                Err(e) if e.is(ErrorKind::Conflict) => {
                    warn!(attempt, portfolio_id = %portfolio.id, "Share token collided on write, retrying");
                }
                Err(e) => return Err(e),
            }
        }

        Err(self.exhausted())
    }

    async fn write(&self, id: Uuid, update: &SharingUpdate) -> Result<Portfolio, AppError> {
        self.portfolios
            .update_sharing(id, update)
            .await?
            .ok_or_else(|| AppError::not_found("Portfolio not found"))
    }

    fn exhausted(&self) -> AppError {
        AppError::internal(format!(
            "Could not store a unique share token after {} attempts",
            self.tokens.max_attempts()
        ))
    }
}
