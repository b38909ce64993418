//! Error type shared by the library and the CLI
//!
//! Only conditions that change what the caller should render (or that come from
//! the filesystem/config edges) are errors. Non-numeric chart values and stale
//! label selections are recovered in place and never show up here.

use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced by reportgrid
#[derive(Debug, Error)]
pub enum Error {
    /// Schema inference was attempted on a collection with no records.
    /// Callers render an empty state rather than a failure.
    #[error("collection has no records")]
    EmptyCollection,

    #[error("failed to read {path}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to list {path}")]
    ReadDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to delete {path}")]
    DeleteFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON")]
    ParseJson(#[from] serde_json::Error),

    #[error("expected a JSON array of records")]
    NotARecordArray,

    #[error("record {index} is not a JSON object")]
    NotAnObject { index: usize },

    #[error("failed to parse config {path}")]
    Config {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
