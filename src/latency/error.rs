//! Error definitions for loading and querying latency data.

use std::path::PathBuf;
use thiserror::Error;

/// Fatal errors raised while loading a source table at startup.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The source file could not be opened.
    #[error("failed to open {table} source {path}: {source}")]
    Open {
        table: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The source could not be read or decoded as CSV.
    #[error("failed to read {table} source: {source}")]
    Read {
        table: &'static str,
        #[source]
        source: csv::Error,
    },

    /// The source has no header row.
    #[error("{table} source has no header row")]
    MissingHeader { table: &'static str },

    /// The header row has fewer columns than the layout requires.
    #[error("{table} header has {found} columns, at least {required} required")]
    MalformedHeader {
        table: &'static str,
        required: usize,
        found: usize,
    },
}

/// Recoverable errors returned to the caller of a query.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    /// The origin region has no row in the latency matrix.
    #[error("origin region {0} not found")]
    NotFound(String),

    /// The request was rejected before reaching the engine.
    #[error("{0}")]
    InvalidInput(String),
}

/// Result type for load operations.
pub type LoadResult<T> = Result<T, LoadError>;
