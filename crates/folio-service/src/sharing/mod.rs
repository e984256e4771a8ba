//! Portfolio sharing: link tokens, link settings, and the access rules.

pub mod access;
pub mod configuration;
pub mod registry;
pub mod service;
pub mod token;

pub use access::{AccessDecision, AccessEvaluator, AccessReason};
pub use configuration::{SharingConfigRequest, SharingConfiguration};
pub use registry::{AuthorizedEmailRegistry, Registration};
pub use service::{
    PublicPortfolio, SharedUpdate, SharedView, SharingGateway, SharingStatus,
};
pub use token::TokenGenerator;
