//! Application state shared across all handlers and middleware.

use std::sync::Arc;
use std::time::Instant;

use folio_auth::JwtDecoder;
use folio_core::config::AppConfig;
use folio_database::Repositories;
use folio_service::SharingGateway;

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// All fields are cheap to clone across tasks.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Arc<AppConfig>,
    /// Storage backend, kept for health checks and shutdown
    pub repositories: Repositories,
    /// JWT token decoder and validator
    pub jwt_decoder: Arc<JwtDecoder>,
    /// Entry point for every sharing operation
    pub gateway: Arc<SharingGateway>,
    /// When the process started serving
    pub started_at: Instant,
}

impl AppState {
    /// Wire the service graph over an opened storage backend.
    pub fn new(config: AppConfig, repositories: Repositories) -> Self {
        let jwt_decoder = Arc::new(JwtDecoder::new(&config.auth));
        let gateway = Arc::new(SharingGateway::from_repositories(
            &repositories,
            &config.sharing,
        ));

        Self {
            config: Arc::new(config),
            repositories,
            jwt_decoder,
            gateway,
            started_at: Instant::now(),
        }
    }
}
