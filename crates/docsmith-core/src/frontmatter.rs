//! Front-matter splitting.
//!
//! A document has front-matter when its first line is exactly `---` and a
//! later line is exactly `---`. The lines between are parsed as YAML.
//! Anything else (including an unterminated block) is treated as a body
//! without front-matter.

use crate::document::FrontMatter;

const DELIMITER: &str = "---";

/// Split raw text into parsed front-matter and the remaining body.
///
/// The body starts on the line after the closing delimiter.
/// Empty or `null` YAML yields an empty mapping.
///
/// # Errors
///
/// Returns the YAML error if the block is present but is not a mapping.
pub fn split_front_matter(raw: &str) -> Result<(FrontMatter, &str), serde_yaml::Error> {
    let text = raw.strip_prefix('\u{feff}').unwrap_or(raw);

    let Some(rest) = strip_opening_delimiter(text) else {
        return Ok((FrontMatter::new(), text));
    };

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if is_delimiter(line) {
            let yaml = &rest[..offset];
            let body = &rest[offset + line.len()..];
            return parse_yaml(yaml).map(|fm| (fm, body));
        }
        offset += line.len();
    }

    Ok((FrontMatter::new(), text))
}

fn strip_opening_delimiter(text: &str) -> Option<&str> {
    let (first, rest) = text.split_once('\n')?;
    is_delimiter(first).then_some(rest)
}

fn is_delimiter(line: &str) -> bool {
    line.trim_end_matches(['\r', '\n']) == DELIMITER
}

fn parse_yaml(yaml: &str) -> Result<FrontMatter, serde_yaml::Error> {
    let trimmed = yaml.trim();
    if trimmed.is_empty() {
        return Ok(FrontMatter::new());
    }
    let parsed: Option<FrontMatter> = serde_yaml::from_str(trimmed)?;
    Ok(parsed.unwrap_or_default())
}

/// Title from front-matter: non-empty strings and numbers qualify.
pub(crate) fn title_of(frontmatter: &FrontMatter) -> Option<String> {
    match frontmatter.get("title")? {
        serde_json::Value::String(s) if !s.is_empty() => Some(s.clone()),
        serde_json::Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
