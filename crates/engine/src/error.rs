//! Errors raised while locating and decoding dashboard snapshots.
//!
//! The analyzer itself has no failure mode; everything here happens before it runs.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SnapshotError {
    #[error("Invalid period code '{0}' (expected YYMM, e.g. 2511)")]
    InvalidPeriod(String),

    #[error("Snapshot not found: {0}")]
    NotFound(String),

    #[error("I/O error reading {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Failed to parse {name}: {source}")]
    Parse {
        name: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Snapshot {name} is for period {found}, expected {expected}")]
    PeriodMismatch {
        name: String,
        expected: String,
        found: String,
    },
}

pub type SnapshotResult<T> = Result<T, SnapshotError>;
