//! Read-only graph and theme analysis over a project snapshot.
//!
//! # Responsibility
//! - Connection analysis around one start page.
//! - Tag-frequency theme extraction over a filtered page subset.

pub mod connections;
pub mod themes;
