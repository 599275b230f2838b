use std::path::PathBuf;

use config::ConfigError;
use thiserror::Error;

/// Every failure that can abort a check run.
///
/// Nothing is retried. The first error from any batch is returned to the
/// caller and the remaining batches are skipped.
#[derive(Debug, Error)]
pub enum CheckerError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("invalid lookup endpoint: {0}")]
    InvalidEndpoint(String),

    #[error("failed to read {}: {source}", path.display())]
    FileAccess {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("lookup request failed: {0}")]
    Transport(String),

    /// The API answered with anything other than `200 OK`.
    #[error("{0}")]
    HttpStatus(String),

    #[error("unexpected lookup response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("failed to write result: {0}")]
    Output(#[from] std::io::Error),
}
