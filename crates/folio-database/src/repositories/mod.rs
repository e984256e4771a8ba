//! PostgreSQL repository implementations.

pub mod authorized_email;
pub mod portfolio;

pub use authorized_email::PgAuthorizedEmailRepository;
pub use portfolio::PgPortfolioRepository;
