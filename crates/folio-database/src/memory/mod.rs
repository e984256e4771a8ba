//! In-memory repository implementations.
//!
//! They mirror the PostgreSQL semantics (unique tokens, compare-and-set
//! token assignment, unique `(portfolio, email)` pairs) and back both the
//! `memory` database provider and the test suites.

pub mod authorized_email;
pub mod portfolio;

pub use authorized_email::MemoryAuthorizedEmailRepository;
pub use portfolio::MemoryPortfolioRepository;
