//! Configuration parsing.
//!
//! Plain `key=value` lines, `#` comments, optional quotes around values and
//! whitespace-separated lists.
//! Precedence: CLI flags > `--config` file > `<theme>/.unique-templates` > defaults.

use crate::types::DEFAULT_EXTENSION;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Config file looked up in the theme directory.
pub const CONFIG_FILE_NAME: &str = ".unique-templates";

/// Content types a stock install registers.
pub const DEFAULT_POST_TYPES: &[&str] = &[
    "post",
    "page",
    "attachment",
    "revision",
    "nav_menu_item",
    "custom_css",
    "customize_changeset",
    "oembed_cache",
    "user_request",
    "wp_block",
    "wp_template",
    "wp_template_part",
    "wp_global_styles",
    "wp_navigation",
    "wp_font_family",
    "wp_font_face",
];

/// Taxonomies a stock install registers.
pub const DEFAULT_TAXONOMIES: &[&str] = &[
    "category",
    "post_tag",
    "nav_menu",
    "link_category",
    "post_format",
    "wp_theme",
    "wp_template_part_area",
    "wp_pattern_category",
];

/// MIME types a stock install allows for upload.
pub const DEFAULT_MIME_TYPES: &[&str] = &[
    "image/jpeg",
    "image/gif",
    "image/png",
    "image/bmp",
    "image/tiff",
    "image/webp",
    "image/avif",
    "image/x-icon",
    "image/heic",
    "video/x-ms-asf",
    "video/x-ms-wmv",
    "video/x-ms-wmx",
    "video/x-ms-wm",
    "video/avi",
    "video/divx",
    "video/x-flv",
    "video/quicktime",
    "video/mpeg",
    "video/mp4",
    "video/ogg",
    "video/webm",
    "video/x-matroska",
    "video/3gpp",
    "video/3gpp2",
    "text/plain",
    "text/csv",
    "text/tab-separated-values",
    "text/calendar",
    "text/richtext",
    "text/css",
    "text/vtt",
    "application/ttaf+xml",
    "audio/mpeg",
    "audio/aac",
    "audio/x-realaudio",
    "audio/wav",
    "audio/ogg",
    "audio/flac",
    "audio/midi",
    "audio/x-ms-wma",
    "audio/x-ms-wax",
    "audio/x-matroska",
    "application/rtf",
    "application/pdf",
    "application/java",
    "application/x-tar",
    "application/zip",
    "application/x-gzip",
    "application/rar",
    "application/x-7z-compressed",
    "application/octet-stream",
    "application/msword",
    "application/vnd.ms-powerpoint",
    "application/vnd.ms-write",
    "application/vnd.ms-excel",
    "application/vnd.ms-access",
    "application/vnd.ms-project",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
    "application/vnd.openxmlformats-officedocument.presentationml.presentation",
    "application/onenote",
    "application/oxps",
    "application/vnd.ms-xpsdocument",
    "application/vnd.oasis.opendocument.text",
    "application/vnd.oasis.opendocument.spreadsheet",
    "application/vnd.oasis.opendocument.presentation",
    "application/vnd.apple.keynote",
    "application/vnd.apple.numbers",
    "application/vnd.apple.pages",
];

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),
    #[error("invalid config line: {0}")]
    InvalidLine(String),
    #[error("invalid integer value for {key}: {value}")]
    InvalidInt { key: String, value: String },
    #[error("invalid template extension: {0:?}")]
    InvalidExtension(String),
}

/// Theme and naming configuration.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct Config {
    // Directories
    /// Parent theme directory. `None` means the theme stands alone.
    pub template_dir: Option<PathBuf>,
    /// Host fallback directory searched after the theme.
    pub compat_dir: Option<PathBuf>,

    // Matching
    /// Template file extension, without the dot.
    pub template_extension: String,
    pub post_types: Vec<String>,
    pub taxonomies: Vec<String>,
    pub mime_types: Vec<String>,

    // Named templates
    /// Subdirectory depth scanned for `Template Name` headers (0 = theme root only).
    pub scan_depth: usize,

    /// Label for templates no rule can name.
    pub default_name: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            template_dir: None,
            compat_dir: None,
            template_extension: DEFAULT_EXTENSION.to_string(),
            post_types: to_strings(DEFAULT_POST_TYPES),
            taxonomies: to_strings(DEFAULT_TAXONOMIES),
            mime_types: to_strings(DEFAULT_MIME_TYPES),
            scan_depth: 1,
            default_name: crate::names::DEFAULT_NAME.to_string(),
        }
    }
}

fn to_strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| (*v).to_string()).collect()
}

impl Config {
    /// Load config from a file, merging with defaults.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        config.load_file(path)?;
        Ok(config)
    }

    /// Load and merge values from a config file.
    pub fn load_file(&mut self, path: &Path) -> Result<(), ConfigError> {
        let content = std::fs::read_to_string(path)?;
        self.parse_content(&content, &path.display().to_string())
    }

    /// Merge `<theme_dir>/.unique-templates` if it exists.
    ///
    /// Relative directories in that file are taken relative to the theme.
    pub fn load_theme_file(&mut self, theme_dir: &Path) -> Result<bool, ConfigError> {
        let path = theme_dir.join(CONFIG_FILE_NAME);
        if !path.is_file() {
            return Ok(false);
        }
        let mut theme_config = self.clone();
        theme_config.load_file(&path)?;
        theme_config.resolve_paths(theme_dir);
        *self = theme_config;
        Ok(true)
    }

    /// Parse config content (key=value format).
    fn parse_content(&mut self, content: &str, source: &str) -> Result<(), ConfigError> {
        for line in content.lines() {
            let trimmed = line.trim();

            // Skip empty lines and comments
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }

            let Some((key, value)) = trimmed.split_once('=') else {
                return Err(ConfigError::InvalidLine(line.to_string()));
            };

            let key = key.trim();
            let value = Self::unquote(value.trim());

            self.apply_value(key, &value, source)?;
        }
        Ok(())
    }

    /// Remove surrounding quotes from a value.
    fn unquote(value: &str) -> String {
        if value.len() >= 2
            && ((value.starts_with('"') && value.ends_with('"'))
                || (value.starts_with('\'') && value.ends_with('\'')))
        {
            return value[1..value.len() - 1].to_string();
        }
        value.to_string()
    }

    /// Apply a single config value.
    fn apply_value(&mut self, key: &str, value: &str, source: &str) -> Result<(), ConfigError> {
        match key {
            "template_dir" => self.template_dir = Self::optional_path(value),
            "compat_dir" => self.compat_dir = Self::optional_path(value),
            "template_extension" => {
                let extension = value.trim_start_matches('.');
                if extension.is_empty() || extension.contains(['/', '\\', '.']) {
                    return Err(ConfigError::InvalidExtension(value.to_string()));
                }
                self.template_extension = extension.to_string();
            }
            "post_types" => self.post_types = Self::list(value),
            "taxonomies" => self.taxonomies = Self::list(value),
            "mime_types" => self.mime_types = Self::list(value),
            "scan_depth" => {
                self.scan_depth = value.parse().map_err(|_| ConfigError::InvalidInt {
                    key: key.to_string(),
                    value: value.to_string(),
                })?;
            }
            "default_name" => {
                if !value.is_empty() {
                    self.default_name = value.to_string();
                }
            }
            _ => {
                // Unknown keys are tolerated so newer config files still load.
                tracing::warn!(key = %key, source = %source, "unknown config key");
            }
        }
        Ok(())
    }

    fn optional_path(value: &str) -> Option<PathBuf> {
        if value.is_empty() {
            None
        } else {
            Some(PathBuf::from(value))
        }
    }

    fn list(value: &str) -> Vec<String> {
        value.split_whitespace().map(String::from).collect()
    }

    /// Resolve relative directories against `base`.
    pub fn resolve_paths(&mut self, base: &Path) {
        if let Some(ref dir) = self.template_dir {
            if dir.is_relative() {
                self.template_dir = Some(base.join(dir));
            }
        }
        if let Some(ref dir) = self.compat_dir {
            if dir.is_relative() {
                self.compat_dir = Some(base.join(dir));
            }
        }
    }

    /// Append content types, skipping ones already present.
    pub fn add_post_types(&mut self, extra: impl IntoIterator<Item = String>) {
        for post_type in extra {
            if !self.post_types.contains(&post_type) {
                self.post_types.push(post_type);
            }
        }
    }

    /// Append taxonomies, skipping ones already present.
    pub fn add_taxonomies(&mut self, extra: impl IntoIterator<Item = String>) {
        for taxonomy in extra {
            if !self.taxonomies.contains(&taxonomy) {
                self.taxonomies.push(taxonomy);
            }
        }
    }
}
