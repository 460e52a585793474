//! Error types.
//!
//! None of these escape a render call: [`DocumentError`] is caught by the
//! document renderer and turned into a plain-text fallback. [`ConfigError`]
//! is only produced by explicit config file operations.

use std::path::PathBuf;
use thiserror::Error;

/// Why a document tree could not be read.
#[derive(Error, Debug)]
pub enum DocumentError {
    #[error("content is not valid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("document has no root object")]
    MissingRoot,

    #[error("document root has no children array")]
    MissingChildren,
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("could not determine config directory")]
    NoConfigDir,

    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}
