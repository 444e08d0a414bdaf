//! Prefix matcher for `{prefix}-{identifier}.{ext}` filenames.
//!
//! All prefixes are folded into one case-insensitive alternation. Alternation
//! is leftmost-first, so prefixes are sorted in reverse lexicographic order:
//! a prefix always comes before any shorter prefix it extends. Without that,
//! `single` would capture `single-my-cpt-foo.php` with identifier
//! `my-cpt-foo` and the `single-my-cpt` entries would never be reached.

use regex::{Regex, RegexBuilder};
use std::collections::BTreeSet;

/// Prefixes recognized regardless of what the host registers.
pub const STATIC_PREFIXES: &[&str] = &[
    "archive",
    "author",
    "attachment",
    "category",
    "page",
    "single",
    "singular",
    "tag",
    "taxonomy",
];

/// Prefixes whose IDs are rendered as integers, without leading zeros.
const INTEGER_ID_PREFIXES: &[&str] = &["page", "author"];

/// How a captured identifier is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentifierKind {
    /// All ASCII digits.
    Id,
    Slug,
}

impl IdentifierKind {
    pub fn classify(identifier: &str) -> Self {
        if !identifier.is_empty() && identifier.bytes().all(|b| b.is_ascii_digit()) {
            Self::Id
        } else {
            Self::Slug
        }
    }

    /// Placeholder used in name table keys.
    pub fn placeholder(&self) -> &'static str {
        match self {
            Self::Id => "{id}",
            Self::Slug => "{slug}",
        }
    }
}

/// A successful prefix match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrefixMatch<'a> {
    /// The prefix as registered. Name table keys use this spelling.
    pub prefix: &'a str,
    /// The prefix as written in the filename.
    pub matched: &'a str,
    pub identifier: &'a str,
    pub kind: IdentifierKind,
}

impl PrefixMatch<'_> {
    /// Name table key for this match, e.g. `page-{id}.php`.
    pub fn table_key(&self, extension: &str) -> String {
        format!("{}-{}.{extension}", self.prefix, self.kind.placeholder())
    }

    /// Identifier as it is substituted into a label.
    ///
    /// Page and author IDs lose leading zeros; every other identifier is
    /// kept as written.
    pub fn display_identifier(&self) -> &str {
        match self.kind {
            IdentifierKind::Id if INTEGER_ID_PREFIXES.iter().any(|p| *p == self.prefix) => {
                let trimmed = self.identifier.trim_start_matches('0');
                if trimmed.is_empty() {
                    "0"
                } else {
                    trimmed
                }
            }
            IdentifierKind::Id | IdentifierKind::Slug => self.identifier,
        }
    }
}

/// Matcher built once per namer.
#[derive(Debug, Clone)]
pub struct PrefixMatcher {
    prefixes: Vec<String>,
    regex: Option<Regex>,
}

impl PrefixMatcher {
    pub fn new<S: AsRef<str>>(content_types: &[S], taxonomies: &[S], extension: &str) -> Self {
        let mut unique: BTreeSet<String> = STATIC_PREFIXES.iter().map(|p| (*p).to_string()).collect();
        for content_type in content_types {
            let content_type = content_type.as_ref();
            unique.insert(format!("single-{content_type}"));
            unique.insert(format!("archive-{content_type}"));
            unique.insert(format!("embed-{content_type}"));
        }
        for taxonomy in taxonomies {
            unique.insert(format!("taxonomy-{}", taxonomy.as_ref()));
        }

        // Reverse lexicographic: longer prefixes precede the ones they extend.
        let prefixes: Vec<String> = unique.into_iter().rev().collect();

        let alternation = prefixes
            .iter()
            .map(|p| regex::escape(p))
            .collect::<Vec<_>>()
            .join("|");
        let pattern = format!(r"^({alternation})-(.+)\.{}$", regex::escape(extension));

        let regex = match RegexBuilder::new(&pattern).case_insensitive(true).build() {
            Ok(regex) => Some(regex),
            Err(e) => {
                tracing::warn!(error = %e, "failed to build template prefix pattern, prefix matching disabled");
                None
            }
        };

        Self { prefixes, regex }
    }

    /// Prefixes in match priority order.
    pub fn prefixes(&self) -> &[String] {
        &self.prefixes
    }

    pub fn find<'a>(&'a self, filename: &'a str) -> Option<PrefixMatch<'a>> {
        let captures = self.regex.as_ref()?.captures(filename)?;
        let matched = captures.get(1)?.as_str();
        let identifier = captures.get(2)?.as_str();
        Some(PrefixMatch {
            prefix: self.registered(matched),
            matched,
            identifier,
            kind: IdentifierKind::classify(identifier),
        })
    }

    /// Registered spelling of a prefix the case-insensitive pattern matched.
    /// An exact spelling wins over a case-folded one.
    fn registered<'a>(&'a self, matched: &'a str) -> &'a str {
        if let Some(exact) = self.prefixes.iter().find(|p| *p == matched) {
            return exact;
        }
        let folded = matched.to_lowercase();
        self.prefixes
            .iter()
            .find(|p| p.to_lowercase() == folded)
            .map_or(matched, String::as_str)
    }
}
