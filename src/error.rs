//! Error types for the build timer

use std::path::PathBuf;

use thiserror::Error;

use crate::codec::CodecError;

/// Errors surfaced by log access, aggregation and chart rendering
#[derive(Error, Debug)]
pub enum BuildTimerError {
    #[error("cannot {action} build log {}: {source}", .path.display())]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("corrupt record #{index} at byte offset {offset}: {source}")]
    CorruptRecord {
        index: usize,
        offset: usize,
        #[source]
        source: CodecError,
    },

    #[error("no successful builds yet")]
    NoSuccessfulBuilds,

    #[error("no data to chart")]
    NoData,

    #[error("failed to serialize report: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Result type for build timer operations
pub type Result<T> = std::result::Result<T, BuildTimerError>;
