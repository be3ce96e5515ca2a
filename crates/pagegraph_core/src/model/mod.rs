//! Domain model for indexed page corpora.
//!
//! # Responsibility
//! - Define the raw export records accepted from page sources.
//! - Define the normalized `Page` entity and the `Project` snapshot that
//!   every query component reads.
//!
//! # Invariants
//! - A `Project` is never mutated after the indexer returns it.
//! - Page titles are the join key for links, backlinks, tags and search.

pub mod page;
pub mod project;
