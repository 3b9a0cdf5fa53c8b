use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced while loading tables or parsing user-supplied text.
///
/// The synthesis and grading functions never fail; only the edges that touch
/// files or free-form input return this type.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("failed to read config {path}: {source}")]
    ConfigIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("unknown window: {0} (expected L5, L10, L20, H2H or season)")]
    UnknownWindow(String),
}

pub type Result<T> = std::result::Result<T, EngineError>;
