//! Portfolio content records.
//!
//! # Responsibility
//! - Define the flat, id-keyed records shown on the public site.
//! - Own each record type's storage key, seed data and validation rules.
//!
//! # Invariants
//! - Every record carries a non-empty `RecordId`.
//! - Wire field names are camelCase so stored JSON stays readable by the site.

pub mod academia;
pub mod project;
pub mod record;
pub mod social;
pub mod visibility;
