//! Response DTOs.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use folio_entity::portfolio::LinkPermission;
use folio_service::sharing::{AccessDecision, AccessReason, PublicPortfolio};

/// Standard response wrapper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T: Serialize> {
    /// Whether the request was successful.
    pub success: bool,
    /// Response data.
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    /// Creates a successful response.
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }

    /// Creates an unsuccessful response that still carries data.
    pub fn failed(data: T) -> Self {
        Self {
            success: false,
            data,
        }
    }
}

/// A portfolio opened through a share link.
#[derive(Debug, Clone, Serialize)]
pub struct SharedPortfolioResponse {
    /// Visible portfolio fields.
    pub portfolio: PublicPortfolio,
    /// Effective permission.
    pub permission: LinkPermission,
    /// Whether the visitor may edit.
    pub can_edit: bool,
    /// Whether the visitor owns the portfolio.
    pub is_owner: bool,
}

/// Render a refused link request. Denials are not errors, so the body
/// keeps the success envelope with `success: false`.
pub fn denial_response(decision: AccessDecision) -> Response {
    let status = match decision.reason() {
        AccessReason::AuthenticationRequired => StatusCode::UNAUTHORIZED,
        _ => StatusCode::FORBIDDEN,
    };
    (status, Json(ApiResponse::failed(decision))).into_response()
}

/// Liveness response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Overall status.
    pub status: String,
    /// Server version.
    pub version: String,
    /// Seconds since startup.
    pub uptime_seconds: u64,
}

/// Health response including the storage backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetailedHealthResponse {
    /// Overall status.
    pub status: String,
    /// Storage backend status.
    pub database: String,
    /// Active storage provider.
    pub provider: String,
}
