//! Name table: filename patterns mapped to label templates.
//!
//! The table holds the static labels for every file the template hierarchy
//! knows about, plus entries derived from the registered content types and
//! taxonomies. Placeholder keys such as `single-{post-type}.php` stay in the
//! table after derivation so the pattern matcher can look them up.

use std::collections::BTreeMap;
use std::fmt;

/// Label used when no rule names a template.
pub const DEFAULT_NAME: &str = "n/a";

/// Key stem of the MIME-type label.
pub const MIME_KEY: &str = "{mime}";

/// Static entries as `(key stem, label)`. Keys gain the template extension
/// when the table is built.
///
/// Placeholders are positional: `{1}` is the first argument.
const STATIC_NAMES: &[(&str, &str)] = &[
    ("index", "Default template"),
    ("home", "Homepage"),
    ("front-page", "Front page"),
    ("single", "Single post template"),
    ("singular", "Singular post template"),
    ("page", "Single page template"),
    ("category", "Category archive"),
    ("tag", "Tag archive"),
    ("taxonomy", "Taxonomy archive"),
    ("archive", "Archive template"),
    ("author", "Author archive"),
    ("date", "Date-based archive"),
    ("search", "Search results"),
    ("404", "404 page"),
    ("attachment", "Attachment template"),
    // text/plain attachments get their own label rather than the MIME one.
    ("plain", "Template for plain-text attachments"),
    ("text-plain", "Template for plain-text attachments"),
    ("embed", "Embed template"),
    // {1} post type, {2} post slug
    ("single-{post-type}-{slug}", "Template for the {1} post with slug \"{2}\""),
    ("single-{post-type}", "Template for single {1} posts"),
    ("page-{slug}", "Template for page with slug \"{1}\""),
    ("page-{id}", "Template for page with ID {1}"),
    ("category-{slug}", "Archive for category with slug \"{1}\""),
    ("category-{id}", "Archive for category with ID {1}"),
    ("tag-{slug}", "Archive for tag with slug \"{1}\""),
    ("tag-{id}", "Archive for tag with ID {1}"),
    // {1} taxonomy, {2} term slug
    ("taxonomy-{taxonomy}-{slug}", "Archive for {1} term with slug \"{2}\""),
    ("taxonomy-{taxonomy}", "Archive for {1} terms"),
    ("archive-{post-type}", "Post type archive for {1}"),
    // {1} author nice-name
    ("author-{slug}", "Archive for author \"{1}\""),
    ("author-{id}", "Archive for author with ID {1}"),
    (MIME_KEY, "Template for {1} MIME-type attachments"),
    // {1} post type, {2} post format
    ("embed-{post-type}-{slug}", "Template for embedding {1} posts with the {2} format"),
    ("embed-{post-type}", "Template for embedding {1} posts"),
];

/// Generic entries cloned for every content type.
const CONTENT_TYPE_ENTRIES: &[&str] = &[
    "single-{post-type}-{slug}",
    "single-{post-type}",
    "archive-{post-type}",
    "embed-{post-type}-{slug}",
    "embed-{post-type}",
];

/// Generic entries cloned for every taxonomy.
const TAXONOMY_ENTRIES: &[&str] = &["taxonomy-{taxonomy}-{slug}", "taxonomy-{taxonomy}"];

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Text(String),
    /// One-based positional argument.
    Arg(usize),
}

/// A label with positional placeholders.
///
/// Parsed once from a format string like `Archive for {1} terms`; rendering
/// never re-scans substituted values, so arguments containing braces are
/// inserted verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameTemplate {
    segments: Vec<Segment>,
}

impl NameTemplate {
    /// Parse a format string. `{n}` with `n >= 1` is a placeholder; any
    /// other brace is literal text.
    pub fn parse(format: &str) -> Self {
        let mut segments = Vec::new();
        let mut rest = format;

        while let Some(open) = rest.find('{') {
            push_text(&mut segments, &rest[..open]);
            let after = &rest[open + 1..];
            let placeholder = after.find('}').and_then(|close| {
                let digits = &after[..close];
                if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
                    return None;
                }
                digits
                    .parse::<usize>()
                    .ok()
                    .filter(|index| *index > 0)
                    .map(|index| (close, index))
            });

            match placeholder {
                Some((close, index)) => {
                    segments.push(Segment::Arg(index));
                    rest = &after[close + 1..];
                }
                None => {
                    push_text(&mut segments, "{");
                    rest = after;
                }
            }
        }
        push_text(&mut segments, rest);

        Self { segments }
    }

    /// Number of arguments the template expects.
    pub fn arity(&self) -> usize {
        self.segments
            .iter()
            .filter_map(|segment| match segment {
                Segment::Arg(index) => Some(*index),
                Segment::Text(_) => None,
            })
            .max()
            .unwrap_or(0)
    }

    /// Substitute the first placeholder and shift the others down by one.
    pub fn bind_first(&self, value: &str) -> Self {
        let mut segments = Vec::with_capacity(self.segments.len());
        for segment in &self.segments {
            match segment {
                Segment::Text(text) => push_text(&mut segments, text),
                Segment::Arg(1) => push_text(&mut segments, value),
                Segment::Arg(index) => segments.push(Segment::Arg(index - 1)),
            }
        }
        Self { segments }
    }

    /// Render with the given arguments. Placeholders without an argument
    /// are kept as `{n}`.
    pub fn render(&self, args: &[&str]) -> String {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Text(text) => out.push_str(text),
                Segment::Arg(index) => match args.get(index - 1) {
                    Some(arg) => out.push_str(arg),
                    None => out.push_str(&format!("{{{index}}}")),
                },
            }
        }
        out
    }
}

impl fmt::Display for NameTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(&[]))
    }
}

fn push_text(segments: &mut Vec<Segment>, text: &str) {
    if text.is_empty() {
        return;
    }
    if let Some(Segment::Text(last)) = segments.last_mut() {
        last.push_str(text);
    } else {
        segments.push(Segment::Text(text.to_string()));
    }
}

/// Immutable lookup from filename (or filename pattern) to label template.
#[derive(Debug, Clone, Default)]
pub struct NameTable {
    extension: String,
    entries: BTreeMap<String, NameTemplate>,
}

impl NameTable {
    pub fn get(&self, key: &str) -> Option<&NameTemplate> {
        self.entries.get(key)
    }

    /// Look up by key stem, appending the table's extension.
    pub fn get_stem(&self, stem: &str) -> Option<&NameTemplate> {
        self.entries.get(&self.key(stem))
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn extension(&self) -> &str {
        &self.extension
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &NameTemplate)> {
        self.entries.iter().map(|(key, value)| (key.as_str(), value))
    }

    fn key(&self, stem: &str) -> String {
        format!("{stem}.{}", self.extension)
    }

    /// Insert unless the key is already present.
    fn insert_new(&mut self, stem: &str, template: NameTemplate) -> bool {
        let key = self.key(stem);
        if self.entries.contains_key(&key) {
            return false;
        }
        self.entries.insert(key, template);
        true
    }

    /// Clone the entry at `generic` with `placeholder` replaced by `value`
    /// in the key and the first argument bound to `value` in the label.
    fn derive(&mut self, generic: &str, placeholder: &str, value: &str) {
        let Some(template) = self.get_stem(generic).map(|t| t.bind_first(value)) else {
            return;
        };
        let target = generic.replacen(placeholder, value, 1);
        if !self.insert_new(&target, template) {
            tracing::debug!(key = %self.key(&target), "derived name collides with existing entry, keeping original");
        }
    }
}

/// Build the name table for a set of registered content types and taxonomies.
///
/// Static entries go in first, then one group per content type, then one per
/// taxonomy. An entry never replaces an existing key, so a type whose name
/// happens to produce a static key cannot clobber the generic label.
pub fn build_name_table<S: AsRef<str>>(
    content_types: &[S],
    taxonomies: &[S],
    extension: &str,
) -> NameTable {
    let mut table = NameTable {
        extension: extension.to_string(),
        entries: BTreeMap::new(),
    };

    for (stem, label) in STATIC_NAMES {
        table.insert_new(stem, NameTemplate::parse(label));
    }

    for content_type in content_types {
        let content_type = content_type.as_ref();
        for generic in CONTENT_TYPE_ENTRIES {
            table.derive(generic, "{post-type}", content_type);
        }
    }

    for taxonomy in taxonomies {
        let taxonomy = taxonomy.as_ref();
        for generic in TAXONOMY_ENTRIES {
            table.derive(generic, "{taxonomy}", taxonomy);
        }
    }

    table
}
