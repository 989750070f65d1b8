//! Content pipeline for Docsmith.
//!
//! Turns a directory tree of Markdown/MDX files into a flat list of
//! [`Document`]s plus a navigation forest of [`TreeItem`]s, the
//! [`DocsData`] snapshot a front-end consumes.
//!
//! # Architecture
//!
//! - [`ConfigResolver`]: hierarchical merge of per-directory JSON configs
//! - [`DocumentParser`]: front-matter split, Markdown processing, headings,
//!   slug and breadcrumbs for one file
//! - [`PluginPipeline`]: ordered [`Plugin`] hooks chained at five stages
//! - [`ContentStore`]: relative path to [`Document`] map with a slug index
//! - [`TreeBuilder`]: per-directory ordered and labeled navigation tree
//! - [`navigation`]: previous/next links from the flattened tree
//! - [`Docsmith`]: sequences full initialization and single-file updates
//!
//! # Quick Start
//!
//! ```no_run
//! # fn main() -> Result<(), docsmith_core::DocsmithError> {
//! use std::path::Path;
//! use docsmith_core::Docsmith;
//!
//! let mut docsmith = Docsmith::builder().build()?;
//! docsmith.initialize(Path::new("."))?;
//!
//! let data = docsmith.get_docs_data()?;
//! println!("{} documents", data.docs.len());
//! # Ok(())
//! # }
//! ```

mod config;
mod docsmith;
mod document;
mod error;
mod frontmatter;
mod headings;
pub mod navigation;
mod parser;
mod plugin;
mod processor;
mod scanner;
pub mod snapshot;
mod source;
mod store;
mod tree;

pub use config::{ConfigFileNames, ConfigResolver, DocsmithConfig};
pub use docsmith::{Docsmith, DocsmithBuilder, DocsmithOptions};
pub use document::{
    Breadcrumb, DocsData, Document, FrontMatter, Heading, NavLink, Navigation,
};
pub use error::DocsmithError;
pub use frontmatter::split_front_matter;
pub use headings::{extract_headings, slugify};
pub use parser::DocumentParser;
pub use plugin::{HookBundle, HookResult, HookStage, InitContext, Plugin, PluginPipeline};
pub use processor::{HtmlProcessor, MarkdownProcessor, ProcessError, RawProcessor};
pub use snapshot::SnapshotFormat;
pub use source::Extensions;
pub use store::ContentStore;
pub use tree::{DocItem, GroupItem, TreeBuilder, TreeItem};
