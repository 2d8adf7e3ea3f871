//! Use-case services over an injected `Store`.
//!
//! # Responsibility
//! - Keep per-type record lists and the durable copy in lockstep.
//! - Surface every persistence and lookup failure to the caller.

pub mod content_manager;
pub mod section_settings;
