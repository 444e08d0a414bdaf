//! The unique-templates listing: collect, name, project, sort.

use crate::collector::collect_templates;
use crate::host::TemplateHost;
use crate::namer::TemplateNamer;
use crate::types::{Field, SortOrder};
use serde::Serialize;
use std::cmp::Ordering;

/// Value of `--fields` that selects every field.
pub const ALL_FIELDS: &str = "all";

/// One row of the listing.
///
/// Fields that were not requested stay `None`. `url` is reserved and never
/// filled in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TemplateRow {
    pub name: Option<String>,
    pub filename: Option<String>,
    pub url: Option<String>,
}

impl TemplateRow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = Some(filename.into());
        self
    }

    /// Value of `field`, if set.
    pub fn get(&self, field: Field) -> Option<&str> {
        match field {
            Field::Name => self.name.as_deref(),
            Field::Filename => self.filename.as_deref(),
            Field::Url => self.url.as_deref(),
        }
    }
}

/// Listing options as accepted on the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListOptions {
    /// Requested fields, in output order.
    pub fields: Vec<Field>,
    pub orderby: Field,
    pub order: SortOrder,
}

impl Default for ListOptions {
    fn default() -> Self {
        Self {
            fields: Field::ALL.to_vec(),
            orderby: Field::Filename,
            order: SortOrder::Asc,
        }
    }
}

/// Parse a comma-separated field list.
///
/// `all` expands to every field. Unknown entries are dropped without error,
/// as are repeats; the caller's order is kept.
pub fn parse_fields(value: &str) -> Vec<Field> {
    let value = value.trim();
    if value == ALL_FIELDS {
        return Field::ALL.to_vec();
    }

    let mut fields = Vec::new();
    for field in value.split(',').filter_map(|f| Field::from_name(f.trim())) {
        if !fields.contains(&field) {
            fields.push(field);
        }
    }
    fields
}

/// Build the sorted listing of unique templates for `host`.
pub fn list_templates<H: TemplateHost + ?Sized>(
    host: &H,
    namer: &TemplateNamer,
    options: &ListOptions,
) -> Vec<TemplateRow> {
    let templates = collect_templates(host, namer.registry());
    // Names are only worth computing when shown or sorted on.
    let want_name = options.fields.contains(&Field::Name) || options.orderby == Field::Name;

    let mut rows: Vec<TemplateRow> = templates
        .iter()
        .map(|template| {
            let row = TemplateRow::new().with_filename(namer.filename(template.as_str()));
            if want_name {
                row.with_name(namer.name_for(template.as_str()))
            } else {
                row
            }
        })
        .collect();

    sort_rows(&mut rows, options.orderby, options.order);
    tracing::debug!(count = rows.len(), "listed unique templates");
    rows
}

/// Stable byte-wise sort on `orderby`; missing values sort as empty.
pub fn sort_rows(rows: &mut [TemplateRow], orderby: Field, order: SortOrder) {
    rows.sort_by(|a, b| compare(a.get(orderby), b.get(orderby)));
    if order == SortOrder::Desc {
        rows.reverse();
    }
}

fn compare(a: Option<&str>, b: Option<&str>) -> Ordering {
    a.unwrap_or("").as_bytes().cmp(b.unwrap_or("").as_bytes())
}
