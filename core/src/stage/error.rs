//! Error types for stage definition loading

use std::path::PathBuf;
use thiserror::Error;

/// Errors during stage definition loading
#[derive(Debug, Error)]
pub enum StageError {
    #[error("failed to read stage file {path}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse stage TOML in {path}")]
    ParseToml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("failed to read stage directory {path}")]
    ReadDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid stage definition in {path}: {reason}")]
    InvalidDefinition { path: PathBuf, reason: String },
}
