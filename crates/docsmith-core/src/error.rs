//! Pipeline error type.

use std::path::PathBuf;

use crate::plugin::HookStage;
use crate::processor::ProcessError;

/// Errors raised by the content pipeline.
///
/// [`DocsmithError::Io`] on a single file is recoverable during
/// initialization (the file is skipped); every other variant aborts the
/// operation that raised it and leaves the previously published state intact.
#[derive(Debug, thiserror::Error)]
pub enum DocsmithError {
    /// Reading or stat-ing a source file failed.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        /// File that failed.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// Front-matter block is not valid YAML mapping.
    #[error("Invalid front-matter in {path}: {source}")]
    FrontMatter {
        /// Relative path of the document.
        path: String,
        /// YAML parse error.
        #[source]
        source: serde_yaml::Error,
    },

    /// Markdown processor rejected the body.
    #[error("Failed to process {path}: {source}")]
    Process {
        /// Relative path of the document.
        path: String,
        /// Processor error.
        #[source]
        source: ProcessError,
    },

    /// A plugin hook returned an error.
    #[error("Plugin '{plugin}' failed in {stage}: {source}")]
    Plugin {
        /// Plugin name.
        plugin: String,
        /// Hook stage that failed.
        stage: HookStage,
        /// Error returned by the hook.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Two documents resolve to the same slug.
    #[error("Slug '{slug}' of {path} is already used by {existing}")]
    DuplicateSlug {
        /// Conflicting slug.
        slug: String,
        /// Path of the rejected document.
        path: String,
        /// Path of the document already holding the slug.
        existing: String,
    },

    /// File does not belong to any configured content folder.
    #[error("{} is not inside any content folder", .0.display())]
    OutsideContent(PathBuf),

    /// File is hidden or matches an exclude pattern.
    #[error("{0} is excluded from content discovery")]
    Excluded(String),

    /// An earlier content folder holds a file at the same relative path.
    #[error("{path} is shadowed by the copy in {}", folder.display())]
    Shadowed {
        /// Relative path of the rejected file.
        path: String,
        /// Earlier content folder that wins.
        folder: PathBuf,
    },

    /// Exclude pattern failed to compile.
    #[error("Invalid exclude pattern '{pattern}': {source}")]
    Pattern {
        /// Offending pattern.
        pattern: String,
        /// Compile error.
        #[source]
        source: glob::PatternError,
    },

    /// Writing a snapshot file failed.
    #[error("Failed to write {}: {source}", path.display())]
    Snapshot {
        /// Target file.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// Snapshot serialization failed.
    #[error("Failed to serialize snapshot: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl DocsmithError {
    /// Whether the error only affects a single file and may be skipped.
    pub fn is_file_io(&self) -> bool {
        matches!(self, Self::Io { .. })
    }

    /// Whether the file is not part of the content at all, as opposed to
    /// content that failed to load.
    pub fn is_ignored_source(&self) -> bool {
        matches!(self, Self::Excluded(_) | Self::Shadowed { .. })
    }
}
