//! Heading extraction and slug generation.

use deunicode::deunicode;
use pulldown_cmark::{Event, HeadingLevel, Parser, Tag, TagEnd};

use crate::document::Heading;
use crate::processor::gfm_options;

/// Extract every ATX/Setext heading from a Markdown body, in order.
///
/// Heading text is the concatenation of its text and inline code spans.
/// Ids are not deduplicated: two headings with the same text share an id.
pub fn extract_headings(body: &str) -> Vec<Heading> {
    let mut headings = Vec::new();
    let mut current: Option<(u8, String)> = None;

    for event in Parser::new_ext(body, gfm_options()) {
        match event {
            Event::Start(Tag::Heading { level, .. }) => {
                current = Some((heading_level_to_num(level), String::new()));
            }
            Event::Text(text) | Event::Code(text) => {
                if let Some((_, buf)) = current.as_mut() {
                    buf.push_str(&text);
                }
            }
            Event::End(TagEnd::Heading(_)) => {
                if let Some((level, text)) = current.take() {
                    let id = slugify(&text);
                    headings.push(Heading {
                        slug: format!("#{id}"),
                        id,
                        text,
                        level,
                    });
                }
            }
            _ => {}
        }
    }

    headings
}

/// Convert text to a lowercase URL-safe slug.
///
/// Text is transliterated to ASCII first (`é` becomes `e`). ASCII letters and
/// digits are kept, whitespace and hyphens collapse into a single `-`, and
/// everything else is dropped.
///
/// # Examples
///
/// ```
/// use docsmith_core::slugify;
///
/// assert_eq!(slugify("Getting Started"), "getting-started");
/// assert_eq!(slugify("What's New?"), "whats-new");
/// assert_eq!(slugify("Café Menu"), "cafe-menu");
/// ```
pub fn slugify(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut pending_dash = false;

    for c in deunicode(text.trim()).chars() {
        if c.is_ascii_alphanumeric() {
            if pending_dash && !result.is_empty() {
                result.push('-');
            }
            pending_dash = false;
            result.push(c.to_ascii_lowercase());
        } else if c.is_whitespace() || c == '-' {
            pending_dash = true;
        }
    }

    result
}

fn heading_level_to_num(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}
