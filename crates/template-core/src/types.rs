//! Core types shared by the collector, namer and listing.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Default template file extension.
pub const DEFAULT_EXTENSION: &str = "php";

/// A template file as reported by the host.
///
/// Usually an absolute path; named templates and test inputs may be relative.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TemplateFile(pub String);

impl TemplateFile {
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Path relative to whichever theme directory contains it.
    pub fn filename(&self, dirs: &ThemeDirs) -> String {
        dirs.relative(&self.0)
    }
}

impl fmt::Display for TemplateFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for TemplateFile {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<PathBuf> for TemplateFile {
    fn from(path: PathBuf) -> Self {
        Self(path.to_string_lossy().into_owned())
    }
}

/// Directories templates are loaded from, in lookup order.
///
/// The stylesheet directory is the active (possibly child) theme, the
/// template directory its parent. Both are equal for a standalone theme.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ThemeDirs {
    pub stylesheet: PathBuf,
    pub template: PathBuf,
    pub compat: Option<PathBuf>,
}

impl ThemeDirs {
    /// Directories for a standalone theme.
    pub fn new(stylesheet: impl Into<PathBuf>) -> Self {
        let stylesheet = stylesheet.into();
        Self {
            template: stylesheet.clone(),
            stylesheet,
            compat: None,
        }
    }

    pub fn with_template(mut self, template: impl Into<PathBuf>) -> Self {
        self.template = template.into();
        self
    }

    pub fn with_compat(mut self, compat: impl Into<PathBuf>) -> Self {
        self.compat = Some(compat.into());
        self
    }

    /// Base directories in lookup order.
    pub fn bases(&self) -> impl Iterator<Item = &Path> {
        [Some(self.stylesheet.as_path()), Some(self.template.as_path())]
            .into_iter()
            .chain(std::iter::once(self.compat.as_deref()))
            .flatten()
    }

    /// Strip the first matching base directory from `path`.
    ///
    /// Paths outside every base directory come back unchanged.
    pub fn relative(&self, path: &str) -> String {
        let candidate = Path::new(path);
        self.bases()
            .filter(|base| !base.as_os_str().is_empty())
            .find_map(|base| candidate.strip_prefix(base).ok())
            .map_or_else(
                || path.to_string(),
                |rest| rest.to_string_lossy().into_owned(),
            )
    }
}

/// One entry of the host's MIME allow-list.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MimeType {
    /// Top-level type (`image` in `image/jpeg`).
    pub kind: String,
    pub subtype: String,
}

impl MimeType {
    /// Parse a `type/subtype` string. Returns `None` for malformed entries.
    pub fn parse(value: &str) -> Option<Self> {
        let (kind, subtype) = value.trim().split_once('/')?;
        if kind.is_empty() || subtype.is_empty() || subtype.contains('/') {
            return None;
        }
        Some(Self {
            kind: kind.to_string(),
            subtype: subtype.to_string(),
        })
    }
}

impl fmt::Display for MimeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.kind, self.subtype)
    }
}

// --- Hierarchy roles ---

/// A role in the template hierarchy, one per host resolver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TemplateRole {
    Index,
    #[serde(rename = "404")]
    NotFound,
    Archive,
    PostTypeArchive,
    Author,
    Category,
    Tag,
    Taxonomy,
    Date,
    Home,
    FrontPage,
    Page,
    Search,
    Single,
    Embed,
    Singular,
    Attachment,
}

impl TemplateRole {
    /// Every role, in the order the collector queries them.
    pub const ALL: [Self; 17] = [
        Self::Index,
        Self::NotFound,
        Self::Archive,
        Self::PostTypeArchive,
        Self::Author,
        Self::Category,
        Self::Tag,
        Self::Taxonomy,
        Self::Date,
        Self::Home,
        Self::FrontPage,
        Self::Page,
        Self::Search,
        Self::Single,
        Self::Embed,
        Self::Singular,
        Self::Attachment,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Index => "index",
            Self::NotFound => "404",
            Self::Archive => "archive",
            Self::PostTypeArchive => "post-type-archive",
            Self::Author => "author",
            Self::Category => "category",
            Self::Tag => "tag",
            Self::Taxonomy => "taxonomy",
            Self::Date => "date",
            Self::Home => "home",
            Self::FrontPage => "front-page",
            Self::Page => "page",
            Self::Search => "search",
            Self::Single => "single",
            Self::Embed => "embed",
            Self::Singular => "singular",
            Self::Attachment => "attachment",
        }
    }
}

impl fmt::Display for TemplateRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// --- Listing options ---

/// A column of the template listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Name,
    Filename,
    Url,
}

impl Field {
    pub const ALL: [Self; 3] = [Self::Name, Self::Filename, Self::Url];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Filename => "filename",
            Self::Url => "url",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "name" => Some(Self::Name),
            "filename" => Some(Self::Filename),
            "url" => Some(Self::Url),
            _ => None,
        }
    }
}

/// Sort direction for the listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}
