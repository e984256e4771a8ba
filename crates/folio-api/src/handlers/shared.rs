//! Public share-link handlers.

use axum::Json;
use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};

use folio_service::sharing::{SharedUpdate, SharedView};

use crate::dto::request::UpdateSharedRequest;
use crate::dto::response::{ApiResponse, SharedPortfolioResponse, denial_response};
use crate::error::ApiError;
use crate::extractors::{MaybeAuthUser, ValidJson};
use crate::state::AppState;

/// GET /api/shared/{token}
pub async fn view_shared(
    State(state): State<AppState>,
    auth: MaybeAuthUser,
    Path(token): Path<String>,
) -> Result<Response, ApiError> {
    let view = state.gateway.view_shared(&token, auth.context()).await?;
    let can_edit = view.can_edit();

    match view {
        SharedView::Granted {
            portfolio,
            permission,
            is_owner,
        } => Ok(Json(ApiResponse::ok(SharedPortfolioResponse {
            portfolio,
            permission,
            can_edit,
            is_owner,
        }))
        .into_response()),
        SharedView::Denied(decision) => Ok(denial_response(decision)),
    }
}

/// PUT /api/shared/{token}
pub async fn update_shared(
    State(state): State<AppState>,
    auth: MaybeAuthUser,
    Path(token): Path<String>,
    ValidJson(req): ValidJson<UpdateSharedRequest>,
) -> Result<Response, ApiError> {
    let outcome = state
        .gateway
        .update_shared(&token, auth.context(), req.into())
        .await?;

    match outcome {
        SharedUpdate::Updated(portfolio) => Ok(Json(serde_json::json!({
            "success": true,
            "data": { "ok": true, "portfolio": portfolio }
        }))
        .into_response()),
        SharedUpdate::Denied(decision) => Ok(denial_response(decision)),
    }
}
