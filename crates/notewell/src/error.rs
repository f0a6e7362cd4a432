//! CLI error types.

use nw_config::ConfigError;

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Serialize(#[from] serde_json::Error),

    #[error("{0}")]
    Validation(String),
}
