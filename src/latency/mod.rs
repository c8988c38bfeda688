//! Latency lookup and filtering subsystem.
//!
//! # Data Flow
//! ```text
//! region map CSV
//!     → metadata.rs (MetadataTable, keyed by region id)
//!
//! latency matrix CSV
//!     → matrix.rs (directed, sparse LatencyMatrix)
//!
//! MetadataTable + LatencyMatrix
//!     → engine.rs (LatencyEngine, immutable)
//!     → shared via Arc with every request handler
//!
//! Offline (latency-cli merge):
//!     per-source CSVs → merge.rs → latency matrix CSV
//! ```
//!
//! # Design Decisions
//! - Both tables are built once at startup and never mutated
//! - Region ids are matched exactly (no trimming or case folding)
//! - A missing latency cell means "not measured", never "infinite"
//! - Cell-level problems are logged and skipped; only unreadable sources fail

pub mod engine;
pub mod error;
pub mod matrix;
pub mod merge;
pub mod metadata;
pub mod types;

pub use engine::LatencyEngine;
pub use error::{LoadError, QueryError};
pub use matrix::LatencyMatrix;
pub use metadata::{MetadataLayout, MetadataTable};
pub use types::{CloudProvider, EligibilityQuery, RegionInfo, RegionMetadata};
