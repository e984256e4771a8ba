//! Sharing gateway: the owner and public entry points.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info};
use uuid::Uuid;

use folio_core::config::SharingConfig;
use folio_core::error::AppError;
use folio_database::{PortfolioRepository, Repositories};
use folio_entity::authorized_email::AuthorizedEmail;
use folio_entity::portfolio::{
    AccessMode, ContentUpdate, LinkAudienceType, LinkPermission, Portfolio, ShareLink,
};

use super::access::{AccessDecision, AccessEvaluator};
use super::configuration::{SharingConfigRequest, SharingConfiguration};
use super::registry::{AuthorizedEmailRegistry, Registration};
use super::token::{TokenGenerator, token_hint};
use crate::context::RequestContext;

/// Longest accepted portfolio title on the public edit path.
const MAX_TITLE_LEN: usize = 255;

/// Sharing state as shown to the owner.
#[derive(Debug, Clone, Serialize)]
pub struct SharingStatus {
    pub access_mode: AccessMode,
    pub link_permission: LinkPermission,
    pub link_audience_type: LinkAudienceType,
    pub share_token: Option<String>,
    pub share_url: Option<String>,
    pub has_active_link: bool,
    pub link_created_at: Option<DateTime<Utc>>,
    pub authorized_emails: Vec<AuthorizedEmail>,
}

/// The portfolio fields a link visitor may see.
#[derive(Debug, Clone, Serialize)]
pub struct PublicPortfolio {
    pub id: Uuid,
    pub title: String,
    pub content: Value,
    pub updated_at: DateTime<Utc>,
}

impl From<Portfolio> for PublicPortfolio {
    fn from(portfolio: Portfolio) -> Self {
        Self {
            id: portfolio.id,
            title: portfolio.title,
            content: portfolio.content,
            updated_at: portfolio.updated_at,
        }
    }
}

/// Result of opening a share link.
#[derive(Debug, Clone)]
pub enum SharedView {
    /// The visitor may see the portfolio.
    Granted {
        portfolio: PublicPortfolio,
        permission: LinkPermission,
        is_owner: bool,
    },
    /// Access was refused; not an error.
    Denied(AccessDecision),
}

impl SharedView {
    /// Whether the visitor may also edit.
    pub fn can_edit(&self) -> bool {
        matches!(self, Self::Granted { permission, .. } if permission.can_edit())
    }
}

/// Result of editing through a share link.
#[derive(Debug, Clone)]
pub enum SharedUpdate {
    /// The content was saved.
    Updated(PublicPortfolio),
    /// Access was refused; not an error.
    Denied(AccessDecision),
}

/// Entry point for every sharing operation.
///
/// Owner operations authorize once, up front, then delegate to
/// [`SharingConfiguration`] or [`AuthorizedEmailRegistry`]. Public
/// operations resolve the token and consult [`AccessEvaluator`] unless the
/// caller owns the portfolio.
#[derive(Debug, Clone)]
pub struct SharingGateway {
    /// Portfolio repository.
    portfolios: Arc<dyn PortfolioRepository>,
    /// Link configuration transitions.
    configuration: Arc<SharingConfiguration>,
    /// Email allow-list.
    registry: Arc<AuthorizedEmailRegistry>,
    /// Non-owner access rules.
    evaluator: Arc<AccessEvaluator>,
    /// Share URL settings.
    sharing: SharingConfig,
}

impl SharingGateway {
    /// Creates a new sharing gateway.
    pub fn new(
        portfolios: Arc<dyn PortfolioRepository>,
        configuration: Arc<SharingConfiguration>,
        registry: Arc<AuthorizedEmailRegistry>,
        evaluator: Arc<AccessEvaluator>,
        sharing: SharingConfig,
    ) -> Self {
        Self {
            portfolios,
            configuration,
            registry,
            evaluator,
            sharing,
        }
    }

    /// Wire the full service graph over one set of repositories.
    pub fn from_repositories(repositories: &Repositories, sharing: &SharingConfig) -> Self {
        let tokens = Arc::new(TokenGenerator::new(repositories.portfolios.clone(), sharing));
        let configuration = Arc::new(SharingConfiguration::new(
            repositories.portfolios.clone(),
            tokens,
        ));
        let registry = Arc::new(AuthorizedEmailRegistry::new(
            repositories.authorized_emails.clone(),
        ));
        let evaluator = Arc::new(AccessEvaluator::new(registry.clone()));

        Self::new(
            repositories.portfolios.clone(),
            configuration,
            registry,
            evaluator,
            sharing.clone(),
        )
    }

    /// Ensure a link exists and is enabled, returning its URL.
    pub async fn generate_link(
        &self,
        ctx: &RequestContext,
        portfolio_id: Uuid,
    ) -> Result<ShareLink, AppError> {
        let portfolio = self.load_owned(ctx, portfolio_id).await?;
        let updated = self.configuration.generate_link(&portfolio).await?;
        self.share_link(&updated)
    }

    /// Replace the link token with a fresh one.
    pub async fn rotate_link(
        &self,
        ctx: &RequestContext,
        portfolio_id: Uuid,
    ) -> Result<ShareLink, AppError> {
        let portfolio = self.load_owned(ctx, portfolio_id).await?;
        let updated = self.configuration.rotate_link(&portfolio).await?;
        self.share_link(&updated)
    }

    /// Turn the link off.
    pub async fn disable_link(
        &self,
        ctx: &RequestContext,
        portfolio_id: Uuid,
    ) -> Result<(), AppError> {
        let portfolio = self.load_owned(ctx, portfolio_id).await?;
        self.configuration.disable_link(&portfolio).await?;
        Ok(())
    }

    /// Full sharing state including the allow-list.
    pub async fn get_status(
        &self,
        ctx: &RequestContext,
        portfolio_id: Uuid,
    ) -> Result<SharingStatus, AppError> {
        let portfolio = self.load_owned(ctx, portfolio_id).await?;
        self.status(portfolio).await
    }

    /// Change the permission granted through the link.
    pub async fn update_permission(
        &self,
        ctx: &RequestContext,
        portfolio_id: Uuid,
        permission: LinkPermission,
    ) -> Result<LinkPermission, AppError> {
        let portfolio = self.load_owned(ctx, portfolio_id).await?;
        let updated = self
            .configuration
            .set_link_permission(&portfolio, permission)
            .await?;
        Ok(updated.link_permission)
    }

    /// Change who may use the link. The allow-list is left untouched.
    pub async fn update_audience_type(
        &self,
        ctx: &RequestContext,
        portfolio_id: Uuid,
        audience: LinkAudienceType,
    ) -> Result<LinkAudienceType, AppError> {
        let portfolio = self.load_owned(ctx, portfolio_id).await?;
        let updated = self
            .configuration
            .set_link_audience_type(&portfolio, audience)
            .await?;
        Ok(updated.link_audience_type)
    }

    /// Apply a complete configuration in one call.
    pub async fn update_sharing_config(
        &self,
        ctx: &RequestContext,
        portfolio_id: Uuid,
        request: SharingConfigRequest,
    ) -> Result<SharingStatus, AppError> {
        let portfolio = self.load_owned(ctx, portfolio_id).await?;
        let updated = self
            .configuration
            .update_full_config(&portfolio, request)
            .await?;
        self.status(updated).await
    }

    /// Add an address to the allow-list, recording the caller as inviter.
    pub async fn add_authorized_email(
        &self,
        ctx: &RequestContext,
        portfolio_id: Uuid,
        email: &str,
    ) -> Result<Registration, AppError> {
        let portfolio = self.load_owned(ctx, portfolio_id).await?;
        self.registry
            .add(portfolio.id, email, ctx.display_label())
            .await
    }

    /// Remove an address from the allow-list.
    pub async fn remove_authorized_email(
        &self,
        ctx: &RequestContext,
        portfolio_id: Uuid,
        email: &str,
    ) -> Result<bool, AppError> {
        let portfolio = self.load_owned(ctx, portfolio_id).await?;
        self.registry.remove(portfolio.id, email).await
    }

    /// The allow-list, oldest invitation first.
    pub async fn list_authorized_emails(
        &self,
        ctx: &RequestContext,
        portfolio_id: Uuid,
    ) -> Result<Vec<AuthorizedEmail>, AppError> {
        let portfolio = self.load_owned(ctx, portfolio_id).await?;
        self.registry.list(portfolio.id).await
    }

    /// Open a share link.
    pub async fn view_shared(
        &self,
        token: &str,
        principal: Option<&RequestContext>,
    ) -> Result<SharedView, AppError> {
        let portfolio = self.load_by_token(token).await?;

        if principal.is_some_and(|ctx| portfolio.is_owned_by(ctx.user_id)) {
            return Ok(SharedView::Granted {
                portfolio: portfolio.into(),
                permission: LinkPermission::ViewEdit,
                is_owner: true,
            });
        }

        let decision = self.evaluate(&portfolio, principal).await?;
        match decision.permission() {
            Some(permission) => Ok(SharedView::Granted {
                portfolio: portfolio.into(),
                permission,
                is_owner: false,
            }),
            None => Ok(SharedView::Denied(decision)),
        }
    }

    /// Edit content through a share link.
    ///
    /// Requires `view_edit`. Only title and content can change; sharing
    /// fields are not reachable from here.
    pub async fn update_shared(
        &self,
        token: &str,
        principal: Option<&RequestContext>,
        update: ContentUpdate,
    ) -> Result<SharedUpdate, AppError> {
        let portfolio = self.load_by_token(token).await?;
        let is_owner = principal.is_some_and(|ctx| portfolio.is_owned_by(ctx.user_id));

        if !is_owner {
            let decision = self.evaluate(&portfolio, principal).await?;
            match decision.permission() {
                None => return Ok(SharedUpdate::Denied(decision)),
                Some(permission) if !permission.can_edit() => {
                    return Err(AppError::permission("This link only allows viewing"));
                }
                Some(_) => {}
            }
        }

        validate_content_update(&update)?;

        let updated = self
            .portfolios
            .update_content(portfolio.id, &update)
            .await?
            .ok_or_else(|| AppError::not_found("Portfolio not found"))?;

        info!(
            portfolio_id = %updated.id,
            user_id = ?principal.map(|ctx| ctx.user_id),
            is_owner,
            "Portfolio updated through share link"
        );

        Ok(SharedUpdate::Updated(updated.into()))
    }

    /// Build the URL for the current token.
    pub fn share_link(&self, portfolio: &Portfolio) -> Result<ShareLink, AppError> {
        let token = portfolio
            .share_token
            .clone()
            .ok_or_else(|| AppError::internal("Portfolio has no share token"))?;
        Ok(ShareLink {
            share_url: self.sharing.share_url(&token),
            token,
            link_created_at: portfolio.link_created_at,
        })
    }

    async fn load_owned(
        &self,
        ctx: &RequestContext,
        portfolio_id: Uuid,
    ) -> Result<Portfolio, AppError> {
        let portfolio = self
            .portfolios
            .find_by_id(portfolio_id)
            .await?
            .ok_or_else(|| AppError::not_found("Portfolio not found"))?;

        if !portfolio.is_owned_by(ctx.user_id) {
            info!(
                user_id = %ctx.user_id,
                %portfolio_id,
                "Rejected sharing change by non-owner"
            );
            return Err(AppError::authorization(
                "Only the owner can manage sharing for this portfolio",
            ));
        }

        Ok(portfolio)
    }

    async fn load_by_token(&self, token: &str) -> Result<Portfolio, AppError> {
        self.portfolios
            .find_by_token(token)
            .await?
            .ok_or_else(|| {
                debug!(token = token_hint(token), "Unknown share token");
                AppError::not_found("Share link not found")
            })
    }

    async fn evaluate(
        &self,
        portfolio: &Portfolio,
        principal: Option<&RequestContext>,
    ) -> Result<AccessDecision, AppError> {
        let requester = principal.and_then(RequestContext::email_address);
        let decision = self
            .evaluator
            .evaluate(portfolio, requester.as_ref())
            .await?;

        if !decision.allowed() {
            info!(
                portfolio_id = %portfolio.id,
                user_id = ?principal.map(|ctx| ctx.user_id),
                reason = %decision.reason(),
                "Share link access denied"
            );
        }
        Ok(decision)
    }

    async fn status(&self, portfolio: Portfolio) -> Result<SharingStatus, AppError> {
        let authorized_emails = self.registry.list(portfolio.id).await?;
        Ok(SharingStatus {
            has_active_link: portfolio.has_active_link(),
            share_url: portfolio
                .share_token
                .as_deref()
                .map(|token| self.sharing.share_url(token)),
            access_mode: portfolio.access_mode,
            link_permission: portfolio.link_permission,
            link_audience_type: portfolio.link_audience_type,
            share_token: portfolio.share_token,
            link_created_at: portfolio.link_created_at,
            authorized_emails,
        })
    }
}

fn validate_content_update(update: &ContentUpdate) -> Result<(), AppError> {
    if update.is_empty() {
        return Err(AppError::validation("Nothing to update"));
    }
    if let Some(title) = &update.title {
        let title = title.trim();
        if title.is_empty() {
            return Err(AppError::validation("Title must not be empty"));
        }
        if title.chars().count() > MAX_TITLE_LEN {
            return Err(AppError::validation(format!(
                "Title must be at most {MAX_TITLE_LEN} characters"
            )));
        }
    }
    Ok(())
}
