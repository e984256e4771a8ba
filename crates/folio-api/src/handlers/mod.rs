//! Route handlers organized by domain.

pub mod health;
pub mod shared;
pub mod sharing;
