//! # folio-api
//!
//! HTTP API layer for Folio portfolio sharing, built on Axum.
//!
//! Provides the owner sharing endpoints, the public share-link endpoints,
//! middleware (CORS, compression, request logging), extractors, DTOs, and
//! error mapping.

pub mod app;
pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use app::build_app;
pub use error::ApiError;
pub use state::AppState;
