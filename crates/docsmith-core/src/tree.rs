//! Navigation tree construction.
//!
//! Documents are grouped by directory. At every level, items named in the
//! effective config's `order` come first in that order; the rest follow
//! sorted by name. Each level is ordered by its own directory's effective
//! config, so a nested `_directory.config.json` reorders its own children.
//!
//! # Labels
//!
//! - group: `directoryLabels[name]` of the group's effective config, else name
//! - document: front-matter title, else `directoryLabels[name]`, else name

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::config::{ConfigResolver, DocsmithConfig};
use crate::document::{Breadcrumb, Document, FrontMatter};
use crate::frontmatter::title_of;
use crate::source::Extensions;

/// Navigation tree node.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum TreeItem {
    Doc(DocItem),
    Group(GroupItem),
}

impl TreeItem {
    /// Name used for ordering (filename stem or directory name).
    pub fn name(&self) -> &str {
        match self {
            Self::Doc(doc) => &doc.name,
            Self::Group(group) => &group.name,
        }
    }

    /// Display label.
    pub fn label(&self) -> &str {
        match self {
            Self::Doc(doc) => &doc.label,
            Self::Group(group) => &group.label,
        }
    }
}

/// Leaf pointing at a document.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DocItem {
    pub name: String,
    pub slug: String,
    pub frontmatter: FrontMatter,
    pub label: String,
    pub breadcrumbs: Vec<Breadcrumb>,
}

/// Directory node.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GroupItem {
    pub name: String,
    pub label: String,
    pub items: Vec<TreeItem>,
}

/// Unsorted group while documents are being placed.
#[derive(Default)]
struct Node {
    path: String,
    groups: Vec<(String, Node)>,
    docs: Vec<DocItem>,
}

impl Node {
    fn child(&mut self, name: &str) -> &mut Node {
        let idx = match self.groups.iter().position(|(n, _)| n == name) {
            Some(idx) => idx,
            None => {
                let path = if self.path.is_empty() {
                    name.to_owned()
                } else {
                    format!("{}/{name}", self.path)
                };
                self.groups.push((
                    name.to_owned(),
                    Node {
                        path,
                        ..Node::default()
                    },
                ));
                self.groups.len() - 1
            }
        };
        &mut self.groups[idx].1
    }
}

/// Builds the navigation forest from documents and directory configs.
pub struct TreeBuilder<'a> {
    resolver: &'a ConfigResolver,
    extensions: &'a Extensions,
}

impl<'a> TreeBuilder<'a> {
    pub fn new(resolver: &'a ConfigResolver, extensions: &'a Extensions) -> Self {
        Self {
            resolver,
            extensions,
        }
    }

    /// Build the tree. Documents are placed by their relative `path`.
    pub fn build<'d>(&self, docs: impl IntoIterator<Item = &'d Document>) -> Vec<TreeItem> {
        let mut root = Node::default();

        for doc in docs {
            let segments: Vec<&str> = doc.path.split('/').filter(|s| !s.is_empty()).collect();
            let Some((file_name, dirs)) = segments.split_last() else {
                continue;
            };

            let mut node = &mut root;
            for dir in dirs {
                node = node.child(dir);
            }

            let name = self.extensions.strip(file_name).to_owned();
            let label = title_of(&doc.frontmatter).unwrap_or_else(|| {
                self.resolver
                    .resolve(&node.path)
                    .label_for(&name)
                    .map_or_else(|| name.clone(), str::to_owned)
            });
            node.docs.push(DocItem {
                name,
                slug: doc.slug.clone(),
                frontmatter: doc.frontmatter.clone(),
                label,
                breadcrumbs: doc.breadcrumbs.clone(),
            });
        }

        self.finish(root)
    }

    fn finish(&self, node: Node) -> Vec<TreeItem> {
        let config = self.resolver.resolve(&node.path);

        let mut items: Vec<TreeItem> = node
            .groups
            .into_iter()
            .map(|(name, child)| {
                let label = self
                    .resolver
                    .resolve(&child.path)
                    .label_for(&name)
                    .map_or_else(|| name.clone(), str::to_owned);
                TreeItem::Group(GroupItem {
                    label,
                    items: self.finish(child),
                    name,
                })
            })
            .chain(node.docs.into_iter().map(TreeItem::Doc))
            .collect();

        items.sort_by(|a, b| compare_items(&config, a, b));
        items
    }
}

/// Ordered names first (by position), then the rest by name. A group sorts
/// before a document of the same name.
fn compare_items(config: &DocsmithConfig, a: &TreeItem, b: &TreeItem) -> Ordering {
    let by_name = match (config.position_of(a.name()), config.position_of(b.name())) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.name().cmp(b.name()),
    };
    by_name.then_with(|| kind_rank(a).cmp(&kind_rank(b)))
}

fn kind_rank(item: &TreeItem) -> u8 {
    match item {
        TreeItem::Group(_) => 0,
        TreeItem::Doc(_) => 1,
    }
}
