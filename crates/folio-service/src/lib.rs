//! # folio-service
//!
//! Business logic service layer for Folio's portfolio sharing. Each service
//! orchestrates the repositories to implement one slice of the sharing
//! model: token issuance, link configuration, the email allow-list, access
//! evaluation, and the owner/public gateway in front of them.
//!
//! Services follow constructor injection: all dependencies are provided
//! at construction time via `Arc` references.

pub mod context;
pub mod sharing;

pub use context::RequestContext;
pub use sharing::{
    AccessDecision, AccessEvaluator, AccessReason, AuthorizedEmailRegistry, SharingConfiguration,
    SharingGateway, TokenGenerator,
};
