//! Owner-side sharing handlers.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;

use crate::dto::request::{
    AddAuthorizedEmailRequest, UpdateAudienceRequest, UpdatePermissionRequest,
    UpdateSharingConfigRequest,
};
use crate::error::ApiError;
use crate::extractors::{AuthUser, ValidJson, parse_uuid};
use crate::state::AppState;

/// POST /api/portfolios/{id}/sharing/link
pub async fn generate_link(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let id = parse_uuid(&id)?;
    let link = state.gateway.generate_link(&auth, id).await?;
    Ok(Json(serde_json::json!({ "success": true, "data": link })))
}

/// POST /api/portfolios/{id}/sharing/link/rotate
pub async fn rotate_link(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let id = parse_uuid(&id)?;
    let link = state.gateway.rotate_link(&auth, id).await?;
    Ok(Json(serde_json::json!({ "success": true, "data": link })))
}

/// DELETE /api/portfolios/{id}/sharing/link
pub async fn disable_link(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let id = parse_uuid(&id)?;
    state.gateway.disable_link(&auth, id).await?;
    Ok(Json(
        serde_json::json!({ "success": true, "data": { "ok": true } }),
    ))
}

/// GET /api/portfolios/{id}/sharing
pub async fn get_status(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let id = parse_uuid(&id)?;
    let status = state.gateway.get_status(&auth, id).await?;
    Ok(Json(serde_json::json!({ "success": true, "data": status })))
}

/// PATCH /api/portfolios/{id}/sharing/permission
pub async fn update_permission(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
    ValidJson(req): ValidJson<UpdatePermissionRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let id = parse_uuid(&id)?;
    let permission = state
        .gateway
        .update_permission(&auth, id, req.link_permission)
        .await?;
    Ok(Json(serde_json::json!({
        "success": true,
        "data": { "link_permission": permission }
    })))
}

/// PATCH /api/portfolios/{id}/sharing/audience
pub async fn update_audience_type(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
    ValidJson(req): ValidJson<UpdateAudienceRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let id = parse_uuid(&id)?;
    let audience = state
        .gateway
        .update_audience_type(&auth, id, req.link_audience_type)
        .await?;
    Ok(Json(serde_json::json!({
        "success": true,
        "data": { "link_audience_type": audience }
    })))
}

/// PUT /api/portfolios/{id}/sharing
pub async fn update_sharing_config(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
    ValidJson(req): ValidJson<UpdateSharingConfigRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let id = parse_uuid(&id)?;
    let status = state
        .gateway
        .update_sharing_config(&auth, id, req.into())
        .await?;
    Ok(Json(serde_json::json!({ "success": true, "data": status })))
}

/// GET /api/portfolios/{id}/sharing/emails
pub async fn list_authorized_emails(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let id = parse_uuid(&id)?;
    let emails = state.gateway.list_authorized_emails(&auth, id).await?;
    Ok(Json(serde_json::json!({ "success": true, "data": emails })))
}

/// POST /api/portfolios/{id}/sharing/emails
///
/// 201 when the address is new, 200 when it was already listed.
pub async fn add_authorized_email(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
    ValidJson(req): ValidJson<AddAuthorizedEmailRequest>,
) -> Result<(StatusCode, Json<serde_json::Value>), ApiError> {
    let id = parse_uuid(&id)?;
    let registration = state
        .gateway
        .add_authorized_email(&auth, id, &req.email)
        .await?;

    let status = if registration.created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((
        status,
        Json(serde_json::json!({ "success": true, "data": registration.entry })),
    ))
}

/// DELETE /api/portfolios/{id}/sharing/emails/{email}
pub async fn remove_authorized_email(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((id, email)): Path<(String, String)>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let id = parse_uuid(&id)?;
    let removed = state
        .gateway
        .remove_authorized_email(&auth, id, &email)
        .await?;
    Ok(Json(serde_json::json!({
        "success": true,
        "data": { "removed": removed }
    })))
}
