//! Source file classification and path derivation.
//!
//! Relative paths are always `/`-separated, independent of the host
//! platform. Slugs and breadcrumbs are derived from them.

use std::path::{Component, Path, PathBuf};

use crate::document::Breadcrumb;

/// Recognized source extensions (without the leading dot).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Extensions(Vec<String>);

impl Extensions {
    /// Build from a list of extensions. A leading dot is tolerated.
    pub fn new<I, S>(extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self(
            extensions
                .into_iter()
                .map(|e| e.as_ref().trim_start_matches('.').to_owned())
                .filter(|e| !e.is_empty())
                .collect(),
        )
    }

    /// Whether a filename carries a recognized extension.
    pub fn matches(&self, file_name: &str) -> bool {
        self.extension_of(file_name).is_some()
    }

    /// Recognized extension of a filename, if any.
    pub fn extension_of(&self, file_name: &str) -> Option<&str> {
        self.0.iter().map(String::as_str).find(|ext| {
            file_name
                .strip_suffix(ext)
                .and_then(|rest| rest.strip_suffix('.'))
                .is_some_and(|stem| !stem.is_empty())
        })
    }

    /// Strip a recognized extension, returning the input unchanged otherwise.
    pub fn strip<'a>(&self, name: &'a str) -> &'a str {
        match self.extension_of(name) {
            Some(ext) => &name[..name.len() - ext.len() - 1],
            None => name,
        }
    }
}

impl Default for Extensions {
    fn default() -> Self {
        Self::new(["md", "mdx"])
    }
}

/// A source file discovered under a content folder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SourceFile {
    /// Content folder the file was found in.
    pub folder: PathBuf,
    /// Absolute (or root-joined) path to the file.
    pub path: PathBuf,
    /// Path relative to `folder`, `/`-separated.
    pub rel_path: String,
}

/// Convert a relative filesystem path to a `/`-separated string.
///
/// Returns `None` if the path escapes its base (`..`) or is absolute.
pub(crate) fn to_relative_string(rel: &Path) -> Option<String> {
    let mut parts = Vec::new();
    for component in rel.components() {
        match component {
            Component::Normal(part) => parts.push(part.to_string_lossy()),
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => return None,
        }
    }
    Some(parts.join("/"))
}

/// Breadcrumbs for a relative path: one per segment, root first.
///
/// The final segment has its source extension stripped so the last
/// breadcrumb's slug equals the document slug.
pub(crate) fn breadcrumbs(rel_path: &str, extensions: &Extensions) -> Vec<Breadcrumb> {
    let segments: Vec<&str> = rel_path.split('/').filter(|s| !s.is_empty()).collect();
    let last = segments.len().saturating_sub(1);
    let mut slug = String::new();

    segments
        .iter()
        .enumerate()
        .map(|(i, segment)| {
            let name = if i == last {
                extensions.strip(segment)
            } else {
                segment
            };
            if !slug.is_empty() {
                slug.push('/');
            }
            slug.push_str(name);
            Breadcrumb {
                name: name.to_owned(),
                slug: slug.clone(),
            }
        })
        .collect()
}
