//! CLI error types.

use docsmith_config::ConfigError;
use docsmith_core::DocsmithError;
use docsmith_watch::WatchError;

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Docsmith(#[from] DocsmithError),

    #[error("{0}")]
    Watch(#[from] WatchError),

    #[error("{0}")]
    Task(String),
}
