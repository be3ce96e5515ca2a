//! Core use-case services.
//!
//! # Responsibility
//! - Own named project snapshots behind an explicit registry object.
//! - Expose the public operations callers and transports map onto.

pub mod catalog;
pub mod project_registry;
