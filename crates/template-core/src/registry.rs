//! Registry of templates that declare their own display name.

use crate::host::{NamedTemplateGroup, TemplateHost};
use std::collections::BTreeMap;

/// Flat map from template path to declared name.
///
/// The host groups named templates by content type, so one file can show up
/// in several groups. The first declaration of a path wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NamedTemplateRegistry {
    templates: BTreeMap<String, String>,
}

impl NamedTemplateRegistry {
    pub fn from_groups(groups: impl IntoIterator<Item = NamedTemplateGroup>) -> Self {
        let mut templates = BTreeMap::new();
        for group in groups {
            for (path, name) in group.templates {
                templates.entry(path).or_insert(name);
            }
        }
        Self { templates }
    }

    /// Fetch the registry from the host.
    pub fn from_host<H: TemplateHost + ?Sized>(host: &H) -> Self {
        let registry = Self::from_groups(host.named_templates());
        tracing::debug!(count = registry.len(), "loaded named templates");
        registry
    }

    pub fn get(&self, path: &str) -> Option<&str> {
        self.templates.get(path).map(String::as_str)
    }

    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.templates.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn group(post_type: &str, templates: &[(&str, &str)]) -> NamedTemplateGroup {
        NamedTemplateGroup {
            post_type: post_type.to_string(),
            templates: templates
                .iter()
                .map(|(p, n)| ((*p).to_string(), (*n).to_string()))
                .collect(),
        }
    }

    #[test]
    fn flattens_groups() {
        let registry = NamedTemplateRegistry::from_groups([
            group("page", &[("/t/full-width.php", "Full Width")]),
            group("post", &[("/t/wide-post.php", "Wide Post")]),
        ]);
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.get("/t/full-width.php"), Some("Full Width"));
        assert_eq!(registry.get("/t/wide-post.php"), Some("Wide Post"));
        assert_eq!(registry.get("full-width.php"), None);
    }

    #[test]
    fn first_declaration_wins() {
        let registry = NamedTemplateRegistry::from_groups([
            group("page", &[("/t/landing.php", "Landing")]),
            group("post", &[("/t/landing.php", "Landing (posts)")]),
        ]);
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get("/t/landing.php"), Some("Landing"));
    }

    #[test]
    fn empty_registry() {
        let registry = NamedTemplateRegistry::from_groups(Vec::new());
        assert!(registry.is_empty());
        assert_eq!(registry.paths().count(), 0);
    }
}
