//! # folio-auth
//!
//! Verification of the bearer tokens issued by the identity provider.
//! Folio never handles passwords or sessions; it only needs to know who
//! is calling (user id and email) to thread an explicit principal into
//! the sharing operations.
//!
//! ## Modules
//!
//! - `jwt`: claims, HS256 decoding and validation, token minting

pub mod jwt;

pub use jwt::{Claims, JwtDecoder, JwtEncoder};
