//! # folio-database
//!
//! Repository traits for portfolios and authorized emails, with
//! PostgreSQL and in-memory implementations, connection management and
//! migrations.

pub mod connection;
pub mod memory;
pub mod migration;
pub mod provider;
pub mod repositories;
pub mod traits;

pub use connection::DatabasePool;
pub use provider::Repositories;
pub use traits::{AuthorizedEmailRepository, PortfolioRepository};
