//! Route definitions for the Folio HTTP API.
//!
//! All routes are organized by domain and mounted under `/api`.
//! The router receives `AppState` and passes it to all handlers via Axum's `State` extractor.

use axum::{
    Router,
    routing::{delete, get, patch, post},
};

use crate::handlers;
use crate::state::AppState;

/// Build the API routes and thread `state` through them.
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .merge(sharing_routes())
        .merge(shared_routes())
        .merge(health_routes());

    Router::new().nest("/api", api_routes).with_state(state)
}

/// Owner-side sharing management; every route requires a bearer token.
fn sharing_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/portfolios/{id}/sharing",
            get(handlers::sharing::get_status).put(handlers::sharing::update_sharing_config),
        )
        .route(
            "/portfolios/{id}/sharing/link",
            post(handlers::sharing::generate_link).delete(handlers::sharing::disable_link),
        )
        .route(
            "/portfolios/{id}/sharing/link/rotate",
            post(handlers::sharing::rotate_link),
        )
        .route(
            "/portfolios/{id}/sharing/permission",
            patch(handlers::sharing::update_permission),
        )
        .route(
            "/portfolios/{id}/sharing/audience",
            patch(handlers::sharing::update_audience_type),
        )
        .route(
            "/portfolios/{id}/sharing/emails",
            get(handlers::sharing::list_authorized_emails)
                .post(handlers::sharing::add_authorized_email),
        )
        .route(
            "/portfolios/{id}/sharing/emails/{email}",
            delete(handlers::sharing::remove_authorized_email),
        )
}

/// Public share-link access; a bearer token is optional.
fn shared_routes() -> Router<AppState> {
    Router::new().route(
        "/shared/{token}",
        get(handlers::shared::view_shared).put(handlers::shared::update_shared),
    )
}

/// Liveness and dependency checks
fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(handlers::health::health))
        .route("/health/detailed", get(handlers::health::health_detailed))
}
