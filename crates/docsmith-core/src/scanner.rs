//! Source discovery by filesystem walking.
//!
//! Only locates files; nothing is read at this stage. Results are sorted
//! by relative path so every later stage sees a deterministic order.

use std::fs;
use std::path::{Path, PathBuf};

use glob::Pattern;

use crate::source::{Extensions, SourceFile};

/// Discovers source files under a content folder.
pub(crate) struct Scanner<'a> {
    extensions: &'a Extensions,
    exclude: &'a [Pattern],
}

impl<'a> Scanner<'a> {
    pub fn new(extensions: &'a Extensions, exclude: &'a [Pattern]) -> Self {
        Self {
            extensions,
            exclude,
        }
    }

    /// Scan one folder. A missing folder yields nothing.
    pub fn scan(&self, folder: &Path) -> Vec<SourceFile> {
        let mut files = Vec::new();
        if folder.is_dir() {
            self.scan_directory(folder, folder, "", &mut files);
        } else {
            tracing::warn!(folder = %folder.display(), "Content folder not found");
        }
        files.sort_by(|a, b| a.rel_path.cmp(&b.rel_path));
        files
    }

    fn scan_directory(&self, folder: &Path, dir: &Path, prefix: &str, files: &mut Vec<SourceFile>) {
        let entries = match fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!(dir = %dir.display(), error = %e, "Skipping unreadable directory");
                return;
            }
        };

        for entry in entries.filter_map(Result::ok) {
            let name = entry.file_name().to_string_lossy().into_owned();
            if name.starts_with('.') {
                continue;
            }

            let rel_path = if prefix.is_empty() {
                name.clone()
            } else {
                format!("{prefix}/{name}")
            };
            if self.is_excluded(&rel_path) {
                tracing::debug!(path = %rel_path, "Excluded");
                continue;
            }

            let path = entry.path();
            if entry.file_type().is_ok_and(|t| t.is_dir()) {
                self.scan_directory(folder, &path, &rel_path, files);
            } else if self.extensions.matches(&name) {
                files.push(SourceFile {
                    folder: folder.to_path_buf(),
                    path,
                    rel_path,
                });
            }
        }
    }

    fn is_excluded(&self, rel_path: &str) -> bool {
        self.exclude.iter().any(|p| p.matches(rel_path))
    }
}

/// Whether discovery skips `rel_path`.
///
/// True if any segment is hidden, or if the path or one of its ancestor
/// directories matches an exclude pattern.
pub(crate) fn is_skipped(exclude: &[Pattern], rel_path: &str) -> bool {
    let mut prefix = String::with_capacity(rel_path.len());
    for segment in rel_path.split('/') {
        if segment.starts_with('.') {
            return true;
        }
        if !prefix.is_empty() {
            prefix.push('/');
        }
        prefix.push_str(segment);
        if exclude.iter().any(|p| p.matches(&prefix)) {
            return true;
        }
    }
    false
}

/// Compile exclude globs.
pub(crate) fn compile_patterns(patterns: &[String]) -> Result<Vec<Pattern>, (String, glob::PatternError)> {
    patterns
        .iter()
        .map(|p| Pattern::new(p).map_err(|e| (p.clone(), e)))
        .collect()
}

/// Scan several folders in order, concatenating results.
pub(crate) fn scan_all(scanner: &Scanner<'_>, folders: &[PathBuf]) -> Vec<SourceFile> {
    folders.iter().flat_map(|folder| scanner.scan(folder)).collect()
}
