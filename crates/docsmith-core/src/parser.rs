//! Single-file document parsing.
//!
//! Stages, in order:
//!
//! 1. read raw text
//! 2. `beforeParse` hooks
//! 3. split front-matter
//! 4. `afterParse` hooks on the body
//! 5. Markdown processor
//! 6. headings, slug, title, breadcrumbs, modification time
//! 7. `transformDoc` hooks

use std::fs;
use std::path::Path;
use std::time::SystemTime;

use chrono::{DateTime, SecondsFormat, Utc};

use crate::document::{Document, Navigation};
use crate::error::DocsmithError;
use crate::frontmatter::{split_front_matter, title_of};
use crate::headings::extract_headings;
use crate::plugin::PluginPipeline;
use crate::processor::MarkdownProcessor;
use crate::source::{Extensions, breadcrumbs, to_relative_string};

/// Parses one source file into a [`Document`].
pub struct DocumentParser<'a> {
    pipeline: &'a PluginPipeline,
    processor: &'a dyn MarkdownProcessor,
    extensions: &'a Extensions,
}

impl<'a> DocumentParser<'a> {
    pub fn new(
        pipeline: &'a PluginPipeline,
        processor: &'a dyn MarkdownProcessor,
        extensions: &'a Extensions,
    ) -> Self {
        Self {
            pipeline,
            processor,
            extensions,
        }
    }

    /// Parse `file_path`, which must live under `content_dir`.
    ///
    /// Navigation is left empty; it is linked after the tree is built.
    pub fn parse(&self, content_dir: &Path, file_path: &Path) -> Result<Document, DocsmithError> {
        let rel_path = file_path
            .strip_prefix(content_dir)
            .ok()
            .and_then(to_relative_string)
            .filter(|p| !p.is_empty())
            .ok_or_else(|| DocsmithError::OutsideContent(file_path.to_path_buf()))?;

        let io_error = |source: std::io::Error| DocsmithError::Io {
            path: file_path.to_path_buf(),
            source,
        };
        let raw_content = fs::read_to_string(file_path).map_err(io_error)?;
        let modified = fs::metadata(file_path)
            .and_then(|m| m.modified())
            .map_err(io_error)?;

        let doc = self.build(rel_path, raw_content, modified)?;
        self.pipeline.transform_doc(doc)
    }

    fn build(
        &self,
        rel_path: String,
        raw_content: String,
        modified: SystemTime,
    ) -> Result<Document, DocsmithError> {
        let text = self.pipeline.before_parse(raw_content.clone())?;
        let (frontmatter, body) =
            split_front_matter(&text).map_err(|source| DocsmithError::FrontMatter {
                path: rel_path.clone(),
                source,
            })?;

        let body = self.pipeline.after_parse(body.to_owned())?;
        let content = self
            .processor
            .process(&body)
            .map_err(|source| DocsmithError::Process {
                path: rel_path.clone(),
                source,
            })?;
        let headings = extract_headings(&body);

        let slug = self.extensions.strip(&rel_path).to_owned();
        let stem = slug.rsplit('/').next().unwrap_or_default();
        let title = title_of(&frontmatter).unwrap_or_else(|| stem.to_owned());
        let is_mdx = self.extensions.extension_of(&rel_path) == Some("mdx");

        tracing::debug!(path = %rel_path, %slug, headings = headings.len(), "Parsed document");

        Ok(Document {
            content,
            raw_content,
            frontmatter,
            breadcrumbs: breadcrumbs(&rel_path, self.extensions),
            title,
            slug,
            path: rel_path,
            headings,
            last_updated: format_timestamp(modified),
            is_markdown: !is_mdx,
            is_mdx,
            navigation: Navigation::default(),
        })
    }
}

/// RFC 3339 in UTC with millisecond precision, e.g. `2024-05-01T12:00:00.000Z`.
fn format_timestamp(time: SystemTime) -> String {
    DateTime::<Utc>::from(time).to_rfc3339_opts(SecondsFormat::Millis, true)
}
