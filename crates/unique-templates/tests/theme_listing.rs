//! Integration tests for listing and naming templates of a theme on disk.
//!
//! Builds child, parent and compat directories in temp dirs and drives the
//! same entry points the binary uses.

use std::fs;
use std::path::Path;
use tempfile::TempDir;
use template_core::listing::{parse_fields, ListOptions};
use template_core::types::{Field, SortOrder};
use unique_templates::render::OutputFormat;
use unique_templates::theme::ThemeHost;
use unique_templates::{load_config, name_files, run_list, ThemeOptions};

struct Fixture {
    child: TempDir,
    parent: TempDir,
    compat: TempDir,
}

fn write(dir: &Path, name: &str, content: &str) {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

fn fixture() -> Fixture {
    let child = TempDir::new().unwrap();
    let parent = TempDir::new().unwrap();
    let compat = TempDir::new().unwrap();

    write(parent.path(), "index.php", "<?php get_header();");
    write(parent.path(), "404.php", "");
    write(parent.path(), "page.php", "");
    write(
        parent.path(),
        "templates/wide.php",
        "<?php\n/**\n * Template Name: Wide\n */\n",
    );

    write(child.path(), "page.php", "");
    write(child.path(), "single.php", "");
    write(
        child.path(),
        "templates/landing.php",
        "<?php\n/*\nTemplate Name: Landing\nTemplate Post Type: post, page\n*/\n",
    );

    write(compat.path(), "embed.php", "");

    Fixture {
        child,
        parent,
        compat,
    }
}

fn options(fixture: &Fixture) -> ThemeOptions {
    ThemeOptions {
        theme: fixture.child.path().to_path_buf(),
        parent_theme: Some(fixture.parent.path().to_path_buf()),
        compat_dir: Some(fixture.compat.path().to_path_buf()),
        post_types: vec!["book".to_string()],
        ..ThemeOptions::default()
    }
}

fn list(fixture: &Fixture, list_options: &ListOptions, format: OutputFormat) -> String {
    let config = load_config(&options(fixture)).unwrap();
    let host = ThemeHost::open(fixture.child.path(), &config).unwrap();
    run_list(&host, &config, list_options, format).unwrap()
}

fn json_rows(output: &str) -> Vec<serde_json::Value> {
    serde_json::from_str(output).unwrap()
}

#[test]
fn lists_unique_templates_across_theme_dirs() {
    let fixture = fixture();
    let output = list(&fixture, &ListOptions::default(), OutputFormat::Json);
    let rows = json_rows(&output);

    let filenames: Vec<_> = rows.iter().map(|r| r["filename"].as_str().unwrap()).collect();
    assert_eq!(
        filenames,
        vec![
            "404.php",
            "embed.php",
            "index.php",
            "page.php",
            "single.php",
            "templates/landing.php",
            "templates/wide.php",
        ]
    );

    let names: Vec<_> = rows.iter().map(|r| r["name"].as_str().unwrap()).collect();
    assert_eq!(
        names,
        vec![
            "404 page",
            "Embed template",
            "Default template",
            "Single page template",
            "Single post template",
            "Landing",
            "Wide",
        ]
    );
    assert!(rows.iter().all(|r| r["url"].is_null()));
}

#[test]
fn count_reflects_deduplicated_set() {
    let fixture = fixture();
    // home and index resolve to the same parent file; page.php exists twice.
    let output = list(&fixture, &ListOptions::default(), OutputFormat::Count);
    assert_eq!(output, "7\n");
}

#[test]
fn sorted_by_name_descending_with_selected_fields() {
    let fixture = fixture();
    let list_options = ListOptions {
        fields: parse_fields("name"),
        orderby: Field::Name,
        order: SortOrder::Desc,
    };
    let output = list(&fixture, &list_options, OutputFormat::Json);
    let rows = json_rows(&output);

    assert_eq!(rows[0]["name"], "Wide");
    assert_eq!(rows[6]["name"], "404 page");
    assert!(rows.iter().all(|r| r.get("filename").is_none()));
}

#[test]
fn table_output_has_header_and_rows() {
    let fixture = fixture();
    let list_options = ListOptions {
        fields: vec![Field::Filename, Field::Name],
        ..ListOptions::default()
    };
    let output = list(&fixture, &list_options, OutputFormat::Table);
    let lines: Vec<_> = output.lines().collect();

    assert_eq!(lines.len(), 9);
    assert!(lines[0].starts_with("filename"));
    assert!(lines[2].starts_with("404.php"));
    assert!(lines[2].ends_with("404 page"));
}

#[test]
fn names_files_given_on_the_command_line() {
    let fixture = fixture();
    let config = load_config(&options(&fixture)).unwrap();
    let host = ThemeHost::open(fixture.child.path(), &config).unwrap();

    let files = [
        "templates/wide.php",
        "page-about.php",
        "single-book-intro.php",
        "taxonomy-category.php",
        "mystery.txt",
    ]
    .map(String::from);

    assert_eq!(
        name_files(&host, &config, &files),
        vec![
            "Wide",
            "Template for page with slug \"about\"",
            "Template for the book post with slug \"intro\"",
            "Archive for category terms",
            "n/a",
        ]
    );
}

#[test]
fn theme_config_file_is_applied() {
    let fixture = fixture();
    let parent_name = fixture.parent.path().to_string_lossy().into_owned();
    write(
        fixture.child.path(),
        ".unique-templates",
        &format!("template_dir={parent_name}\npost_types=post page\ndefault_name=unnamed\n"),
    );

    let theme_options = ThemeOptions {
        theme: fixture.child.path().to_path_buf(),
        ..ThemeOptions::default()
    };
    let config = load_config(&theme_options).unwrap();
    assert_eq!(config.template_dir.as_deref(), Some(fixture.parent.path()));
    assert_eq!(config.post_types, vec!["post", "page"]);

    let host = ThemeHost::open(fixture.child.path(), &config).unwrap();
    let names = name_files(&host, &config, &["templates/wide.php".to_string(), "x.php".to_string()]);
    assert_eq!(names, vec!["Wide", "unnamed"]);
}

#[test]
fn command_line_overrides_config_file() {
    let fixture = fixture();
    let config_path = fixture.child.path().join("custom.conf");
    fs::write(&config_path, "compat_dir=/nowhere\npost_types=post\n").unwrap();

    let theme_options = ThemeOptions {
        config: Some(config_path),
        compat_dir: Some(fixture.compat.path().to_path_buf()),
        post_types: vec!["book".to_string()],
        ..options(&fixture)
    };
    let config = load_config(&theme_options).unwrap();

    assert_eq!(config.compat_dir.as_deref(), Some(fixture.compat.path()));
    assert_eq!(config.post_types, vec!["post", "book"]);
}

#[test]
fn missing_theme_directory_fails() {
    let tmp = TempDir::new().unwrap();
    let config = load_config(&ThemeOptions {
        theme: tmp.path().join("missing"),
        ..ThemeOptions::default()
    })
    .unwrap();
    assert!(ThemeHost::open(&tmp.path().join("missing"), &config).is_err());
}
