//! Snapshot serialization.
//!
//! A [`DocsData`] snapshot is written as plain JSON and as ES/CommonJS
//! modules exposing `docs`, `tree`, `getDoc(slug)`, `getTree()` and
//! `getDocs()`.

use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use crate::document::DocsData;
use crate::error::DocsmithError;

/// Output file flavor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotFormat {
    /// `docsmith-data.json`
    Json,
    /// `index.js` (ES module)
    Esm,
    /// `index.cjs` (CommonJS)
    Cjs,
}

impl SnapshotFormat {
    pub fn file_name(self) -> &'static str {
        match self {
            Self::Json => "docsmith-data.json",
            Self::Esm => "index.js",
            Self::Cjs => "index.cjs",
        }
    }
}

/// Render a snapshot in one format.
pub fn render(data: &DocsData, format: SnapshotFormat) -> Result<String, DocsmithError> {
    match format {
        SnapshotFormat::Json => {
            let mut out = serde_json::to_string_pretty(data)?;
            out.push('\n');
            Ok(out)
        }
        SnapshotFormat::Esm => render_module(data, ModuleKind::Esm),
        SnapshotFormat::Cjs => render_module(data, ModuleKind::Cjs),
    }
}

/// Write a snapshot in every requested format under `dir`.
///
/// Each file is written to a temporary sibling and renamed into place so
/// readers never observe a partial file. Returns the written paths.
pub fn write(
    data: &DocsData,
    dir: &Path,
    formats: &[SnapshotFormat],
) -> Result<Vec<PathBuf>, DocsmithError> {
    fs::create_dir_all(dir).map_err(|source| DocsmithError::Snapshot {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut written = Vec::with_capacity(formats.len());
    for &format in formats {
        let path = dir.join(format.file_name());
        let content = render(data, format)?;
        write_atomic(&path, &content)?;
        tracing::debug!(path = %path.display(), bytes = content.len(), "Wrote snapshot");
        written.push(path);
    }
    Ok(written)
}

fn write_atomic(path: &Path, content: &str) -> Result<(), DocsmithError> {
    let tmp = path.with_extension("tmp");
    fs::write(&tmp, content)
        .and_then(|()| fs::rename(&tmp, path))
        .map_err(|source| DocsmithError::Snapshot {
            path: path.to_path_buf(),
            source,
        })
}

#[derive(Clone, Copy)]
enum ModuleKind {
    Esm,
    Cjs,
}

fn render_module(data: &DocsData, kind: ModuleKind) -> Result<String, DocsmithError> {
    let docs = serde_json::to_string(&data.docs)?;
    let tree = serde_json::to_string(&data.tree)?;

    let (declare, export_fn) = match kind {
        ModuleKind::Esm => ("export const", "export function"),
        ModuleKind::Cjs => ("const", "function"),
    };

    let mut out = String::with_capacity(docs.len() + tree.len() + 512);
    // `write!` into a String cannot fail.
    let _ = writeln!(out, "{declare} docs = {docs};");
    let _ = writeln!(out, "{declare} tree = {tree};");
    let _ = write!(
        out,
        "
{export_fn} getDoc(slug) {{
  return docs.find((doc) => doc.slug === slug) ?? null;
}}

{export_fn} getTree() {{
  return tree;
}}

{export_fn} getDocs() {{
  return docs;
}}
"
    );

    if let ModuleKind::Cjs = kind {
        out.push_str("\nmodule.exports = { docs, tree, getDoc, getTree, getDocs };\n");
    }
    Ok(out)
}
