//! Errors raised while updating the store.

use vvdata_parse::ParseError;

use crate::config::ConfigError;

/// Errors that can occur during an update run.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("RAW_DIR not found: {0}")]
    RawDirNotFound(String),

    #[error("Failed to read {path}: {message}")]
    ReadError { path: String, message: String },

    #[error("Failed to parse {path}: {source}")]
    ParseError {
        path: String,
        #[source]
        source: ParseError,
    },

    #[error("Invalid state file {path}: {message}")]
    StateError { path: String, message: String },

    #[error("Failed to write output: {0}")]
    WriteError(String),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Parser(#[from] ParseError),
}
