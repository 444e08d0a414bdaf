//! List the unique templates a theme uses and name them.
//!
//! The binary is a thin clap layer over the functions here; integration
//! tests drive them directly.

pub mod render;
pub mod theme;

use render::{render_rows, OutputFormat, RenderError};
use std::path::{Path, PathBuf};
use template_core::config::{Config, ConfigError};
use template_core::listing::{list_templates, ListOptions};
use template_core::{TemplateHost, TemplateNamer};
use theme::ThemeHost;

/// Theme selection and overrides shared by every command.
#[derive(Debug, Clone, Default)]
pub struct ThemeOptions {
    /// Active (stylesheet) theme directory.
    pub theme: PathBuf,
    pub parent_theme: Option<PathBuf>,
    pub compat_dir: Option<PathBuf>,
    /// Explicit config file, applied over the theme's own.
    pub config: Option<PathBuf>,
    pub post_types: Vec<String>,
    pub taxonomies: Vec<String>,
}

/// Build the effective config.
///
/// Later sources win: defaults, `<theme>/.unique-templates`, the explicit
/// config file, then command line overrides.
pub fn load_config(options: &ThemeOptions) -> Result<Config, ConfigError> {
    let mut config = Config::default();
    if config.load_theme_file(&options.theme)? {
        tracing::debug!(theme = %options.theme.display(), "loaded theme config");
    }
    if let Some(ref path) = options.config {
        config.load_file(path)?;
        tracing::debug!(path = %path.display(), "loaded config file");
    }

    if let Some(ref parent) = options.parent_theme {
        config.template_dir = Some(parent.clone());
    }
    if let Some(ref compat) = options.compat_dir {
        config.compat_dir = Some(compat.clone());
    }
    config.add_post_types(options.post_types.iter().cloned());
    config.add_taxonomies(options.taxonomies.iter().cloned());
    Ok(config)
}

/// Namer for `host`, honouring the configured fallback label.
pub fn build_namer<H: TemplateHost + ?Sized>(host: &H, config: &Config) -> TemplateNamer {
    TemplateNamer::new(host).with_default_name(config.default_name.clone())
}

/// Run the listing and render it.
pub fn run_list(
    host: &ThemeHost,
    config: &Config,
    options: &ListOptions,
    format: OutputFormat,
) -> Result<String, RenderError> {
    let namer = build_namer(host, config);
    let rows = list_templates(host, &namer, options);
    render_rows(&rows, &options.fields, format)
}

/// Label each of `files`, one per entry.
///
/// Relative paths are looked up under the theme directories first so that
/// named templates match on their full path.
pub fn name_files(host: &ThemeHost, config: &Config, files: &[String]) -> Vec<String> {
    let namer = build_namer(host, config);
    files
        .iter()
        .map(|file| namer.name_for(&locate_file(host, file)))
        .collect()
}

fn locate_file(host: &ThemeHost, file: &str) -> String {
    let path = Path::new(file);
    if path.is_absolute() {
        return file.to_string();
    }
    host.theme_dirs()
        .bases()
        .map(|base| base.join(path))
        .find(|candidate| candidate.is_file())
        .map_or_else(|| file.to_string(), |p| p.to_string_lossy().into_owned())
}
