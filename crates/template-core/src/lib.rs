pub mod collector;
pub mod config;
pub mod headers;
pub mod host;
pub mod listing;
pub mod namer;
pub mod names;
pub mod pattern;
pub mod registry;
pub mod types;

pub use collector::collect_templates;
pub use config::Config;
pub use host::{NamedTemplateGroup, StaticHost, TemplateHost};
pub use listing::{list_templates, ListOptions, TemplateRow};
pub use namer::TemplateNamer;
pub use names::{build_name_table, NameTable, NameTemplate};
pub use registry::NamedTemplateRegistry;
pub use types::*;
