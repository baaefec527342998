//! Error types for dashboard-layout
//!
//! Layout generation, the durable key-value store, and the persistence
//! facade each get their own enum so callers can tell a corrupted input
//! apart from an unavailable disk.

use std::path::PathBuf;
use thiserror::Error;

use crate::types::BreakpointName;

/// Layout generation errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LayoutError {
    /// Active widget id has no sizing entry in the catalog
    #[error("Unknown widget in active set: {0}")]
    UnknownWidget(String),

    /// Active widget id appears more than once
    #[error("Widget listed twice in active set: {0}")]
    DuplicateWidget(String),

    /// Breakpoint cannot hold any cell
    #[error("Breakpoint {0} has zero columns")]
    ZeroColumns(BreakpointName),
}

/// Key-value store errors
#[derive(Debug, Error)]
pub enum StoreError {
    /// I/O failure on the backing file
    #[error("Store I/O failed at {path}")]
    Io {
        /// File that could not be read or written
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Store refused the operation
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    /// Value is larger than the store accepts
    #[error("Quota exceeded for {key}: {size} bytes (limit {limit})")]
    QuotaExceeded {
        /// Key being written
        key: String,
        /// Size of the rejected value
        size: usize,
        /// Configured limit
        limit: usize,
    },
}

/// Errors surfaced by [`crate::LayoutStore::save`]
#[derive(Debug, Error)]
pub enum PersistError {
    /// State could not be encoded as JSON
    #[error("Failed to encode dashboard state: {0}")]
    Encode(#[from] serde_json::Error),

    /// Store rejected the write of one key
    #[error("Failed to write {key}")]
    Write {
        /// Key that failed
        key: &'static str,
        /// Store error
        #[source]
        source: StoreError,
    },
}
