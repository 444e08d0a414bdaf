//! Output rendering for the unique-templates CLI.
//!
//! Rows are projected onto the requested fields, then written as an aligned
//! table, JSON, YAML, or a bare count.

use serde::ser::{Serialize, SerializeMap, Serializer};
use template_core::types::Field;
use template_core::TemplateRow;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to encode JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("failed to encode YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Output format for `list`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
    Yaml,
    Count,
}

impl OutputFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Table => "table",
            Self::Json => "json",
            Self::Yaml => "yaml",
            Self::Count => "count",
        }
    }
}

/// Render `rows` with only `fields`, in that order.
pub fn render_rows(
    rows: &[TemplateRow],
    fields: &[Field],
    format: OutputFormat,
) -> Result<String, RenderError> {
    let projected: Vec<Projected<'_>> = rows.iter().map(|row| Projected { row, fields }).collect();

    match format {
        OutputFormat::Table => Ok(render_table(rows, fields)),
        OutputFormat::Json => {
            let mut out = serde_json::to_string(&projected)?;
            out.push('\n');
            Ok(out)
        }
        OutputFormat::Yaml => Ok(serde_yaml::to_string(&projected)?),
        OutputFormat::Count => Ok(format!("{}\n", rows.len())),
    }
}

/// A row serialized as a map of the requested fields, in request order.
struct Projected<'a> {
    row: &'a TemplateRow,
    fields: &'a [Field],
}

impl Serialize for Projected<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for field in self.fields {
            map.serialize_entry(field.as_str(), &self.row.get(*field))?;
        }
        map.end()
    }
}

fn render_table(rows: &[TemplateRow], fields: &[Field]) -> String {
    if fields.is_empty() {
        return String::new();
    }

    let cells: Vec<Vec<String>> = rows
        .iter()
        .map(|row| {
            fields
                .iter()
                .map(|field| sanitize(row.get(*field).unwrap_or("")))
                .collect()
        })
        .collect();

    let mut widths: Vec<usize> = fields.iter().map(|f| f.as_str().len()).collect();
    for row in &cells {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    let header: Vec<String> = fields.iter().map(|f| f.as_str().to_string()).collect();
    push_line(&mut out, &header, &widths);
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    push_line(&mut out, &rule, &widths);
    for row in &cells {
        push_line(&mut out, row, &widths);
    }
    out
}

fn push_line(out: &mut String, cells: &[String], widths: &[usize]) {
    let mut line = String::new();
    for (i, (cell, width)) in cells.iter().zip(widths).enumerate() {
        if i > 0 {
            line.push_str("  ");
        }
        line.push_str(&format!("{cell:<width$}"));
    }
    out.push_str(line.trim_end());
    out.push('\n');
}

/// Keep a cell on one line.
fn sanitize(value: &str) -> String {
    value
        .chars()
        .map(|c| if c.is_control() { ' ' } else { c })
        .collect()
}
