//! Ingestion pipeline: raw batches -> normalized pages -> project snapshot.
//!
//! # Responsibility
//! - Obtain raw export batches through the `PageSource` seam.
//! - Normalize pages and build the derived indexes of a `Project`.
//!
//! # Invariants
//! - Indexing starts only after every batch of a project is materialized.
//! - Malformed page records are absorbed by defaulting; only batch-level
//!   read/parse failures abort a load.

pub mod indexer;
pub mod normalizer;
pub mod source;
