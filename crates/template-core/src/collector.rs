//! Collect the distinct template files a theme uses.

use crate::host::TemplateHost;
use crate::registry::NamedTemplateRegistry;
use crate::types::{TemplateFile, TemplateRole};
use std::collections::BTreeSet;

/// Union of every role's resolved template and every named template.
///
/// Roles the host cannot resolve are skipped. Several roles commonly resolve
/// to the same file (`home` falls back to `index`), and those collapse into
/// one entry.
pub fn collect_templates<H: TemplateHost + ?Sized>(
    host: &H,
    registry: &NamedTemplateRegistry,
) -> BTreeSet<TemplateFile> {
    let mut templates = BTreeSet::new();

    for role in TemplateRole::ALL {
        match host.resolve_template(role) {
            Some(path) if !path.is_empty() => {
                tracing::debug!(role = %role, path = %path, "resolved template");
                templates.insert(TemplateFile::new(path));
            }
            _ => tracing::debug!(role = %role, "no template for role"),
        }
    }

    templates.extend(
        registry
            .paths()
            .filter(|path| !path.is_empty())
            .map(TemplateFile::new),
    );

    templates
}
