//! The host environment the core queries.
//!
//! The core never looks at the filesystem itself: hierarchy resolution,
//! named-template discovery and the registered content types all come
//! through [`TemplateHost`].

use crate::types::{TemplateRole, ThemeDirs, DEFAULT_EXTENSION};
use std::collections::BTreeMap;

/// Named templates declared for one content type.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NamedTemplateGroup {
    pub post_type: String,
    /// Template path to declared name, in discovery order.
    pub templates: Vec<(String, String)>,
}

/// Queries the core needs answered by the surrounding environment.
pub trait TemplateHost {
    /// Directories used to project paths to theme-relative filenames.
    fn theme_dirs(&self) -> &ThemeDirs;

    fn template_extension(&self) -> &str {
        DEFAULT_EXTENSION
    }

    /// Resolve the template the hierarchy picks for `role`.
    ///
    /// `None` covers both "no such template in this theme" and "the host has
    /// no resolver for this role".
    fn resolve_template(&self, role: TemplateRole) -> Option<String>;

    /// Templates carrying an explicit display name, grouped by content type.
    fn named_templates(&self) -> Vec<NamedTemplateGroup>;

    /// Registered content type identifiers.
    fn post_types(&self) -> Vec<String>;

    /// Registered taxonomy identifiers.
    fn taxonomies(&self) -> Vec<String>;

    /// Allowed MIME types as raw `type/subtype` strings.
    fn allowed_mime_types(&self) -> Vec<String>;
}

/// A host backed by plain data.
///
/// Useful when the host state was exported elsewhere, and in tests.
#[derive(Debug, Clone, Default)]
pub struct StaticHost {
    pub dirs: ThemeDirs,
    pub extension: Option<String>,
    pub resolved: BTreeMap<TemplateRole, String>,
    pub named: Vec<NamedTemplateGroup>,
    pub post_types: Vec<String>,
    pub taxonomies: Vec<String>,
    pub mime_types: Vec<String>,
}

impl StaticHost {
    pub fn new(dirs: ThemeDirs) -> Self {
        Self {
            dirs,
            ..Default::default()
        }
    }

    pub fn with_resolved(mut self, role: TemplateRole, path: impl Into<String>) -> Self {
        self.resolved.insert(role, path.into());
        self
    }

    pub fn with_named(
        mut self,
        post_type: impl Into<String>,
        path: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        let post_type = post_type.into();
        let entry = (path.into(), name.into());
        match self.named.iter_mut().find(|g| g.post_type == post_type) {
            Some(group) => group.templates.push(entry),
            None => self.named.push(NamedTemplateGroup {
                post_type,
                templates: vec![entry],
            }),
        }
        self
    }

    pub fn with_post_types<I, S>(mut self, post_types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.post_types.extend(post_types.into_iter().map(Into::into));
        self
    }

    pub fn with_taxonomies<I, S>(mut self, taxonomies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.taxonomies.extend(taxonomies.into_iter().map(Into::into));
        self
    }

    pub fn with_mime_types<I, S>(mut self, mime_types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.mime_types.extend(mime_types.into_iter().map(Into::into));
        self
    }

    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = Some(extension.into());
        self
    }
}

impl TemplateHost for StaticHost {
    fn theme_dirs(&self) -> &ThemeDirs {
        &self.dirs
    }

    fn template_extension(&self) -> &str {
        self.extension.as_deref().unwrap_or(DEFAULT_EXTENSION)
    }

    fn resolve_template(&self, role: TemplateRole) -> Option<String> {
        self.resolved.get(&role).cloned()
    }

    fn named_templates(&self) -> Vec<NamedTemplateGroup> {
        self.named.clone()
    }

    fn post_types(&self) -> Vec<String> {
        self.post_types.clone()
    }

    fn taxonomies(&self) -> Vec<String> {
        self.taxonomies.clone()
    }

    fn allowed_mime_types(&self) -> Vec<String> {
        self.mime_types.clone()
    }
}
