//! Filesystem-backed theme host.
//!
//! Resolves the template hierarchy against the theme directories on disk and
//! discovers named templates from their file headers.

use std::collections::BTreeMap;
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use template_core::config::Config;
use template_core::headers::{parse_template_headers, HEADER_SCAN_BYTES};
use template_core::{NamedTemplateGroup, TemplateHost, TemplateRole, ThemeDirs};
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Error)]
pub enum ThemeError {
    #[error("theme directory not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("theme path is not a directory: {}", .0.display())]
    NotADirectory(PathBuf),
}

/// A theme on disk, optionally with a parent theme and a compat directory.
#[derive(Debug, Clone)]
pub struct ThemeHost {
    dirs: ThemeDirs,
    extension: String,
    post_types: Vec<String>,
    taxonomies: Vec<String>,
    mime_types: Vec<String>,
    named: Vec<NamedTemplateGroup>,
}

impl ThemeHost {
    /// Open the theme at `stylesheet` using the directories and registered
    /// types from `config`.
    ///
    /// Named templates are discovered here, once.
    pub fn open(stylesheet: &Path, config: &Config) -> Result<Self, ThemeError> {
        check_dir(stylesheet)?;

        let mut dirs = ThemeDirs::new(stylesheet);
        if let Some(ref template) = config.template_dir {
            check_dir(template)?;
            dirs = dirs.with_template(template);
        }
        if let Some(ref compat) = config.compat_dir {
            if !compat.is_dir() {
                warn!(path = %compat.display(), "compat directory not found");
            }
            dirs = dirs.with_compat(compat);
        }

        let named = discover_named_templates(&dirs, &config.template_extension, config.scan_depth);

        Ok(Self {
            dirs,
            extension: config.template_extension.clone(),
            post_types: config.post_types.clone(),
            taxonomies: config.taxonomies.clone(),
            mime_types: config.mime_types.clone(),
            named,
        })
    }

    /// Filenames tried for `role` when nothing specific is queried.
    fn candidates(&self, role: TemplateRole) -> Vec<String> {
        match role {
            TemplateRole::Home => vec![
                format!("home.{}", self.extension),
                format!("index.{}", self.extension),
            ],
            // Needs a queried post type to name a file.
            TemplateRole::PostTypeArchive => Vec::new(),
            _ => vec![format!("{}.{}", role.as_str(), self.extension)],
        }
    }

    /// First existing `name` in stylesheet, template, then compat dir.
    fn locate(&self, name: &str) -> Option<PathBuf> {
        self.dirs
            .bases()
            .map(|base| base.join(name))
            .find(|path| path.is_file())
    }
}

impl TemplateHost for ThemeHost {
    fn theme_dirs(&self) -> &ThemeDirs {
        &self.dirs
    }

    fn template_extension(&self) -> &str {
        &self.extension
    }

    fn resolve_template(&self, role: TemplateRole) -> Option<String> {
        self.candidates(role)
            .iter()
            .find_map(|name| self.locate(name))
            .map(|path| path.to_string_lossy().into_owned())
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

fn check_dir(path: &Path) -> Result<(), ThemeError> {
    match fs::metadata(path) {
        Ok(meta) if meta.is_dir() => Ok(()),
        Ok(_) => Err(ThemeError::NotADirectory(path.to_path_buf())),
        Err(_) => Err(ThemeError::NotFound(path.to_path_buf())),
    }
}

/// Scan the theme and its parent for templates with a `Template Name`
/// header, grouped by the content types they declare.
///
/// A file in the child theme hides the parent's file at the same relative
/// path.
fn discover_named_templates(
    dirs: &ThemeDirs,
    extension: &str,
    max_depth: usize,
) -> Vec<NamedTemplateGroup> {
    let mut files: BTreeMap<PathBuf, PathBuf> = BTreeMap::new();
    scan_directory(&dirs.stylesheet, Path::new(""), 0, max_depth, extension, &mut files);
    if dirs.template != dirs.stylesheet {
        scan_directory(&dirs.template, Path::new(""), 0, max_depth, extension, &mut files);
    }

    let mut groups: BTreeMap<String, Vec<(String, String)>> = BTreeMap::new();
    for path in files.values() {
        let content = match read_header_block(path) {
            Ok(content) => content,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to read template");
                continue;
            }
        };

        let Some(headers) = parse_template_headers(&content) else {
            continue;
        };

        let full = path.to_string_lossy().into_owned();
        for post_type in headers.post_types {
            groups
                .entry(post_type)
                .or_default()
                .push((full.clone(), headers.name.clone()));
        }
    }

    debug!(post_types = groups.len(), "discovered named templates");

    groups
        .into_iter()
        .map(|(post_type, templates)| NamedTemplateGroup {
            post_type,
            templates,
        })
        .collect()
}

/// Collect `*.{extension}` files under `dir`, keyed by path relative to the
/// theme root. Existing keys are kept.
fn scan_directory(
    dir: &Path,
    relative: &Path,
    depth: usize,
    max_depth: usize,
    extension: &str,
    files: &mut BTreeMap<PathBuf, PathBuf>,
) {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            warn!(path = %dir.display(), error = %e, "failed to read theme directory");
            return;
        }
    };

    for entry in entries.filter_map(Result::ok) {
        let path = entry.path();
        let file_name = entry.file_name();
        if file_name.to_string_lossy().starts_with('.') {
            continue;
        }
        let rel = relative.join(&file_name);

        if path.is_dir() {
            if depth < max_depth {
                scan_directory(&path, &rel, depth + 1, max_depth, extension, files);
            }
            continue;
        }

        if path.extension().is_some_and(|ext| ext == extension) {
            files.entry(rel).or_insert(path);
        }
    }
}

/// Read the part of a file that may carry headers.
fn read_header_block(path: &Path) -> std::io::Result<String> {
    let mut buf = Vec::with_capacity(HEADER_SCAN_BYTES);
    fs::File::open(path)?
        .take(HEADER_SCAN_BYTES as u64)
        .read_to_end(&mut buf)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(dir: &Path, name: &str, content: &str) {
        let path = dir.join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
    }

    fn named(name: &str) -> String {
        format!("<?php\n/*\n * Template Name: {name}\n */\n")
    }

    fn open(dir: &Path) -> ThemeHost {
        ThemeHost::open(dir, &Config::default()).unwrap()
    }

    #[test]
    fn missing_stylesheet_dir_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let result = ThemeHost::open(&tmp.path().join("gone"), &Config::default());
        assert!(matches!(result, Err(ThemeError::NotFound(_))));

        write(tmp.path(), "file.php", "");
        let result = ThemeHost::open(&tmp.path().join("file.php"), &Config::default());
        assert!(matches!(result, Err(ThemeError::NotADirectory(_))));
    }

    #[test]
    fn missing_parent_dir_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let mut config = Config::default();
        config.template_dir = Some(tmp.path().join("parent"));
        assert!(matches!(
            ThemeHost::open(tmp.path(), &config),
            Err(ThemeError::NotFound(_))
        ));
    }

    #[test]
    fn resolves_role_files() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "index.php", "");
        write(tmp.path(), "404.php", "");
        write(tmp.path(), "front-page.php", "");

        let host = open(tmp.path());
        let expect = |name: &str| Some(tmp.path().join(name).to_string_lossy().into_owned());
        assert_eq!(host.resolve_template(TemplateRole::Index), expect("index.php"));
        assert_eq!(host.resolve_template(TemplateRole::NotFound), expect("404.php"));
        assert_eq!(host.resolve_template(TemplateRole::FrontPage), expect("front-page.php"));
        assert_eq!(host.resolve_template(TemplateRole::Search), None);
        assert_eq!(host.resolve_template(TemplateRole::PostTypeArchive), None);
    }

    #[test]
    fn home_falls_back_to_index() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "index.php", "");
        let host = open(tmp.path());
        assert_eq!(
            host.resolve_template(TemplateRole::Home),
            host.resolve_template(TemplateRole::Index)
        );

        write(tmp.path(), "home.php", "");
        let host = open(tmp.path());
        assert_eq!(
            host.resolve_template(TemplateRole::Home),
            Some(tmp.path().join("home.php").to_string_lossy().into_owned())
        );
    }

    #[test]
    fn child_theme_wins_over_parent() {
        let child = TempDir::new().unwrap();
        let parent = TempDir::new().unwrap();
        write(child.path(), "single.php", "");
        write(parent.path(), "single.php", "");
        write(parent.path(), "page.php", "");

        let mut config = Config::default();
        config.template_dir = Some(parent.path().to_path_buf());
        let host = ThemeHost::open(child.path(), &config).unwrap();

        let single = host.resolve_template(TemplateRole::Single).unwrap();
        assert!(single.starts_with(&*child.path().to_string_lossy()));
        let page = host.resolve_template(TemplateRole::Page).unwrap();
        assert!(page.starts_with(&*parent.path().to_string_lossy()));
    }

    #[test]
    fn compat_dir_is_searched_last() {
        let theme = TempDir::new().unwrap();
        let compat = TempDir::new().unwrap();
        write(compat.path(), "embed.php", "");

        let mut config = Config::default();
        config.compat_dir = Some(compat.path().to_path_buf());
        let host = ThemeHost::open(theme.path(), &config).unwrap();

        assert_eq!(
            host.resolve_template(TemplateRole::Embed),
            Some(compat.path().join("embed.php").to_string_lossy().into_owned())
        );
    }

    #[test]
    fn custom_extension_is_used() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "index.twig", "");
        write(tmp.path(), "index.php", "");

        let mut config = Config::default();
        config.template_extension = "twig".to_string();
        let host = ThemeHost::open(tmp.path(), &config).unwrap();

        assert_eq!(host.template_extension(), "twig");
        assert!(host
            .resolve_template(TemplateRole::Index)
            .unwrap()
            .ends_with("index.twig"));
    }

    #[test]
    fn discovers_named_templates_by_post_type() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "index.php", "<?php get_header();");
        write(tmp.path(), "full-width.php", &named("Full Width"));
        write(
            tmp.path(),
            "templates/landing.php",
            "<?php\n/*\nTemplate Name: Landing\nTemplate Post Type: post, page\n*/\n",
        );

        let groups = open(tmp.path()).named_templates();
        let post_types: Vec<_> = groups.iter().map(|g| g.post_type.as_str()).collect();
        assert_eq!(post_types, vec!["page", "post"]);

        let page = &groups[0].templates;
        assert_eq!(page.len(), 2);
        assert!(page.iter().any(|(p, n)| p.ends_with("full-width.php") && n == "Full Width"));
        assert!(page.iter().any(|(p, n)| p.ends_with("landing.php") && n == "Landing"));
        assert_eq!(groups[1].templates.len(), 1);
    }

    #[test]
    fn scan_depth_limits_subdirectories() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "a/b/deep.php", &named("Deep"));
        write(tmp.path(), ".hidden/secret.php", &named("Secret"));
        write(tmp.path(), "notes.txt", &named("Not a template"));

        assert!(open(tmp.path()).named_templates().is_empty());

        let mut config = Config::default();
        config.scan_depth = 2;
        let groups = ThemeHost::open(tmp.path(), &config).unwrap().named_templates();
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].templates[0].1, "Deep");
    }

    #[test]
    fn child_named_template_hides_parent_copy() {
        let child = TempDir::new().unwrap();
        let parent = TempDir::new().unwrap();
        write(child.path(), "wide.php", &named("Child Wide"));
        write(parent.path(), "wide.php", &named("Parent Wide"));
        write(parent.path(), "narrow.php", &named("Narrow"));

        let mut config = Config::default();
        config.template_dir = Some(parent.path().to_path_buf());
        let groups = ThemeHost::open(child.path(), &config).unwrap().named_templates();

        let names: Vec<_> = groups[0].templates.iter().map(|(_, n)| n.as_str()).collect();
        assert_eq!(names, vec!["Narrow", "Child Wide"]);
    }
}
