//! Portfolio aggregate and its sharing configuration.

pub mod link;
pub mod model;
pub mod sharing;

pub use link::ShareLink;
pub use model::{ContentUpdate, CreatePortfolio, Portfolio, SharingUpdate};
pub use sharing::{AccessMode, LinkAudienceType, LinkPermission};
