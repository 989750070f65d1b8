//! Document data model.
//!
//! Field names serialize in camelCase so the [`DocsData`] JSON matches what
//! the front-end runtime reads (`rawContent`, `lastUpdated`, `isMDX`, ...).

use serde::{Deserialize, Serialize};

use crate::tree::TreeItem;

/// Loosely-typed key/value mapping parsed from a document's metadata block.
pub type FrontMatter = serde_json::Map<String, serde_json::Value>;

/// One parsed source file.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    /// Processed body (after `afterParse` hooks and the Markdown processor).
    pub content: String,
    /// File text as read from disk, front-matter included.
    pub raw_content: String,
    /// Parsed front-matter.
    pub frontmatter: FrontMatter,
    /// Path without its source extension, `/`-separated. Unique in the store.
    pub slug: String,
    /// Path relative to the content folder, `/`-separated.
    pub path: String,
    /// Front-matter title, else the filename stem.
    pub title: String,
    /// One entry per path segment, root first.
    pub breadcrumbs: Vec<Breadcrumb>,
    /// Headings in document order.
    pub headings: Vec<Heading>,
    /// File modification time (RFC 3339, UTC, millisecond precision).
    pub last_updated: String,
    /// True for `.md` (any recognized extension other than `.mdx`).
    pub is_markdown: bool,
    /// True for `.mdx`.
    #[serde(rename = "isMDX")]
    pub is_mdx: bool,
    /// Previous/next links, populated by the navigation linker.
    pub navigation: Navigation,
}

/// Breadcrumb navigation item.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Breadcrumb {
    /// Segment name (extension stripped on the final segment).
    pub name: String,
    /// Accumulated slug up to and including this segment.
    pub slug: String,
}

/// Heading extracted from a document body.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Heading {
    /// URL-safe slug of the heading text.
    pub id: String,
    /// Heading text.
    pub text: String,
    /// Heading level (1-6).
    pub level: u8,
    /// Anchor link (`#` + id).
    pub slug: String,
}

/// Previous/next document links.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Navigation {
    /// Preceding document in tree order.
    pub previous: Option<NavLink>,
    /// Following document in tree order.
    pub next: Option<NavLink>,
}

/// Link to a neighboring document.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavLink {
    /// Display title.
    pub title: String,
    /// Target document slug.
    pub slug: String,
    /// Navigation label of the target tree item.
    pub label: String,
}

/// Published snapshot: every document plus the navigation tree.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DocsData {
    /// Documents in path order.
    pub docs: Vec<Document>,
    /// Navigation forest.
    pub tree: Vec<TreeItem>,
}
