//! Allow-list entries for `emails_only` share links.

pub mod address;
pub mod model;

pub use address::EmailAddress;
pub use model::AuthorizedEmail;
