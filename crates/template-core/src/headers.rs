//! Template file header parsing.
//!
//! Page templates declare themselves with comment headers near the top of
//! the file:
//!
//! ```php
//! <?php
//! /**
//!  * Template Name: Full Width
//!  * Template Post Type: post, page
//!  */
//! ```

use regex::Regex;
use std::sync::OnceLock;

/// Only this many bytes from the start of a file are searched.
pub const HEADER_SCAN_BYTES: usize = 8 * 1024;

/// Content type a named template applies to when it does not say.
pub const DEFAULT_POST_TYPE: &str = "page";

/// Headers extracted from a named template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateHeaders {
    pub name: String,
    /// Content types the template is offered for. Never empty.
    pub post_types: Vec<String>,
}

fn name_regex() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?mi)Template Name:(.*)$").ok())
        .as_ref()
}

fn post_type_regex() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?mi)Template Post Type:(.*)$").ok())
        .as_ref()
}

/// Parse the template headers from file content.
///
/// Returns `None` when the file has no `Template Name` header or the
/// declared name is empty.
pub fn parse_template_headers(content: &str) -> Option<TemplateHeaders> {
    let head = header_block(content);

    let name = name_regex()?
        .captures(head)
        .and_then(|c| c.get(1))
        .map(|m| cleanup_header_comment(m.as_str()))?;
    if name.is_empty() {
        return None;
    }

    let mut post_types: Vec<String> = post_type_regex()
        .and_then(|re| re.captures(head))
        .and_then(|c| c.get(1))
        .map(|m| {
            cleanup_header_comment(m.as_str())
                .split(',')
                .map(sanitize_key)
                .filter(|t| !t.is_empty())
                .collect()
        })
        .unwrap_or_default();
    if post_types.is_empty() {
        post_types.push(DEFAULT_POST_TYPE.to_string());
    }

    Some(TemplateHeaders { name, post_types })
}

/// The leading part of `content` that may hold headers, cut on a char
/// boundary.
fn header_block(content: &str) -> &str {
    if content.len() <= HEADER_SCAN_BYTES {
        return content;
    }
    let mut end = HEADER_SCAN_BYTES;
    while !content.is_char_boundary(end) {
        end -= 1;
    }
    &content[..end]
}

/// Trim a header value and drop a trailing comment close (`*/`) or PHP
/// close tag (`?>`) together with anything after it.
fn cleanup_header_comment(value: &str) -> String {
    let cut = [value.find("*/"), value.find("?>")]
        .into_iter()
        .flatten()
        .min()
        .unwrap_or(value.len());
    value[..cut].trim().to_string()
}

/// Lowercase and keep only `[a-z0-9_-]`, the shape of registered keys.
fn sanitize_key(value: &str) -> String {
    value
        .trim()
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '_' || *c == '-')
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_doc_block_header() {
        let content = "<?php\n/**\n * Template Name: Full Width\n */\n\nget_header();\n";
        let headers = parse_template_headers(content).unwrap();
        assert_eq!(headers.name, "Full Width");
        assert_eq!(headers.post_types, vec!["page"]);
    }

    #[test]
    fn parses_post_type_list() {
        let content = "<?php\n/*\nTemplate Name: Wide\nTemplate Post Type: post, Page , product\n*/\n";
        let headers = parse_template_headers(content).unwrap();
        assert_eq!(headers.name, "Wide");
        assert_eq!(headers.post_types, vec!["post", "page", "product"]);
    }

    #[test]
    fn single_line_comment_with_close() {
        let content = "<?php /* Template Name: Landing */ ?>\n<html></html>";
        let headers = parse_template_headers(content).unwrap();
        assert_eq!(headers.name, "Landing");
    }

    #[test]
    fn hash_comment_and_crlf() {
        let content = "<?php\r\n# Template Name: Legacy\r\n";
        let headers = parse_template_headers(content).unwrap();
        assert_eq!(headers.name, "Legacy");
    }

    #[test]
    fn header_is_case_insensitive() {
        let content = "<?php\n// template name: Lowercase\n";
        assert_eq!(parse_template_headers(content).unwrap().name, "Lowercase");
    }

    #[test]
    fn missing_or_empty_header() {
        assert!(parse_template_headers("<?php get_header();").is_none());
        assert!(parse_template_headers("<?php\n/* Template Name: */\n").is_none());
        assert!(parse_template_headers("").is_none());
    }

    #[test]
    fn empty_post_type_list_defaults_to_page() {
        let content = "<?php\n/*\nTemplate Name: X\nTemplate Post Type: ,\n*/\n";
        assert_eq!(parse_template_headers(content).unwrap().post_types, vec!["page"]);
    }

    #[test]
    fn header_past_scan_window_is_ignored() {
        let content = format!("<?php\n{}\n/* Template Name: Too Late */\n", " ".repeat(HEADER_SCAN_BYTES));
        assert!(parse_template_headers(&content).is_none());
    }

    #[test]
    fn header_block_respects_char_boundaries() {
        let content = format!("{}é tail", "a".repeat(HEADER_SCAN_BYTES - 1));
        let head = header_block(&content);
        assert_eq!(head.len(), HEADER_SCAN_BYTES - 1);
    }

    #[test]
    fn cleanup_header_comment_cuts_at_first_close() {
        assert_eq!(cleanup_header_comment("  Name */ more"), "Name");
        assert_eq!(cleanup_header_comment(" Name ?> */"), "Name");
        assert_eq!(cleanup_header_comment(" Plain "), "Plain");
    }
}
