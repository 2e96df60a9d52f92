//! Harness error type.

use std::path::PathBuf;

use thiserror::Error;

use formatstring_reference::LiteralError;

#[derive(Debug, Error)]
pub enum HarnessError {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid configuration {path}: {source}")]
    Config {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to spawn subject {program}: {source}")]
    Spawn {
        program: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("subject stream unavailable: {0}")]
    StreamUnavailable(&'static str),

    #[error("subject {0} reader thread panicked")]
    ReaderPanicked(&'static str),

    #[error("literal encoding: {0}")]
    Literal(#[from] LiteralError),

    #[error("type {0:?} is not part of the test plan")]
    TypeNotPlanned(String),
}
