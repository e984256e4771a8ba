//! # folio-entity
//!
//! Domain entity models for Folio. Every struct in this crate represents a
//! database table row or a domain value object. Database entities derive
//! `sqlx::FromRow`.

pub mod authorized_email;
pub mod portfolio;
