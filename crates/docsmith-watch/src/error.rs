//! Watch error type.

use docsmith_core::DocsmithError;

/// Errors raised while watching content.
#[derive(Debug, thiserror::Error)]
pub enum WatchError {
    /// Watcher backend failed.
    #[error("File watcher error: {0}")]
    Notify(#[from] notify::Error),

    /// None of the content folders could be watched.
    #[error("No content folder could be watched")]
    NothingToWatch,

    /// Pipeline failed while applying a batch.
    #[error(transparent)]
    Pipeline(#[from] DocsmithError),
}
