//! Markdown processing.
//!
//! The [`MarkdownProcessor`] trait is the seam between document parsing and
//! body rendering. [`HtmlProcessor`] renders GitHub-flavored Markdown to
//! HTML; [`RawProcessor`] passes the body through for consumers that
//! compile MDX themselves.

use pulldown_cmark::{Options, Parser, html};

/// Error returned by a [`MarkdownProcessor`].
#[derive(Debug, thiserror::Error)]
pub enum ProcessError {
    /// Processor rejected the input.
    #[error("{0}")]
    Rejected(String),
}

/// Transforms a document body into its published content.
pub trait MarkdownProcessor: Send + Sync {
    /// Process a body (front-matter already removed).
    fn process(&self, body: &str) -> Result<String, ProcessError>;
}

/// GitHub-flavored Markdown to HTML.
#[derive(Debug, Clone, Copy)]
pub struct HtmlProcessor {
    options: Options,
}

impl HtmlProcessor {
    /// Create a processor with GFM extensions enabled.
    pub fn new() -> Self {
        Self {
            options: gfm_options(),
        }
    }
}

impl Default for HtmlProcessor {
    fn default() -> Self {
        Self::new()
    }
}

impl MarkdownProcessor for HtmlProcessor {
    fn process(&self, body: &str) -> Result<String, ProcessError> {
        let parser = Parser::new_ext(body, self.options);
        let mut out = String::with_capacity(body.len() * 3 / 2);
        html::push_html(&mut out, parser);
        Ok(out)
    }
}

/// Returns the body unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct RawProcessor;

impl MarkdownProcessor for RawProcessor {
    fn process(&self, body: &str) -> Result<String, ProcessError> {
        Ok(body.to_owned())
    }
}

pub(crate) fn gfm_options() -> Options {
    Options::ENABLE_TABLES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS
        | Options::ENABLE_GFM
}
