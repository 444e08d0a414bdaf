//! Human-readable names for template files.
//!
//! Resolution order, first match wins:
//! 1. the path declares its own name (named template registry)
//! 2. the theme-relative filename is a literal name table key
//! 3. the filename is `{prefix}-{id|slug}.{ext}` for a known prefix
//! 4. the filename names an allowed MIME type
//! 5. the default label

use crate::host::TemplateHost;
use crate::names::{build_name_table, NameTable, DEFAULT_NAME, MIME_KEY};
use crate::pattern::PrefixMatcher;
use crate::registry::NamedTemplateRegistry;
use crate::types::{MimeType, ThemeDirs};

/// Names templates for one theme.
///
/// Everything the matching needs is fetched from the host at construction
/// and never changes afterwards, so `name_for` is a pure function of its
/// input for the lifetime of the namer.
#[derive(Debug, Clone)]
pub struct TemplateNamer {
    dirs: ThemeDirs,
    registry: NamedTemplateRegistry,
    table: NameTable,
    matcher: PrefixMatcher,
    mime_types: Vec<MimeType>,
    default_name: String,
}

impl TemplateNamer {
    pub fn new<H: TemplateHost + ?Sized>(host: &H) -> Self {
        let extension = host.template_extension();
        let post_types = host.post_types();
        let taxonomies = host.taxonomies();

        let mime_types: Vec<MimeType> = host
            .allowed_mime_types()
            .iter()
            .filter_map(|raw| {
                let parsed = MimeType::parse(raw);
                if parsed.is_none() {
                    tracing::debug!(mime = %raw, "skipping malformed MIME type");
                }
                parsed
            })
            .collect();

        let table = build_name_table(&post_types, &taxonomies, extension);
        let matcher = PrefixMatcher::new(&post_types, &taxonomies, extension);

        tracing::debug!(
            entries = table.len(),
            prefixes = matcher.prefixes().len(),
            mime_types = mime_types.len(),
            "built template name table"
        );

        Self {
            dirs: host.theme_dirs().clone(),
            registry: NamedTemplateRegistry::from_host(host),
            table,
            matcher,
            mime_types,
            default_name: DEFAULT_NAME.to_string(),
        }
    }

    /// Replace the label returned when nothing matches.
    pub fn with_default_name(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        if !name.is_empty() {
            self.default_name = name;
        }
        self
    }

    pub fn registry(&self) -> &NamedTemplateRegistry {
        &self.registry
    }

    pub fn table(&self) -> &NameTable {
        &self.table
    }

    /// Theme-relative filename for `filepath`.
    pub fn filename(&self, filepath: &str) -> String {
        self.dirs.relative(filepath)
    }

    /// Best human-readable name for a template path. Never empty.
    pub fn name_for(&self, filepath: &str) -> String {
        if let Some(name) = self.registry.get(filepath) {
            return name.to_string();
        }

        let filename = self.filename(filepath);

        if let Some(template) = self.table.get(&filename) {
            return template.render(&[]);
        }

        self.match_prefix(&filename)
            .or_else(|| self.match_mime(&filename))
            .unwrap_or_else(|| {
                tracing::trace!(filename = %filename, "no naming rule matched");
                self.default_name.clone()
            })
    }

    fn match_prefix(&self, filename: &str) -> Option<String> {
        let found = self.matcher.find(filename)?;
        let key = found.table_key(self.table.extension());
        let template = self.table.get(&key)?;
        Some(template.render(&[found.display_identifier()]))
    }

    /// `{subtype}.ext` and `{type}-{subtype}.ext` are checked across every
    /// allowed type before the bare `{type}.ext`, so the more specific label
    /// wins when both could apply.
    fn match_mime(&self, filename: &str) -> Option<String> {
        let template = self.table.get_stem(MIME_KEY)?;
        let extension = self.table.extension();

        let specific = self.mime_types.iter().find(|mime| {
            filename == format!("{}.{extension}", mime.subtype)
                || filename == format!("{}-{}.{extension}", mime.kind, mime.subtype)
        });
        if let Some(mime) = specific {
            return Some(template.render(&[&mime.to_string()]));
        }

        self.mime_types
            .iter()
            .find(|mime| filename == format!("{}.{extension}", mime.kind))
            .map(|mime| template.render(&[&mime.kind]))
    }
}
