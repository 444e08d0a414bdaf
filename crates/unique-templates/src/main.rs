//! unique-templates - list the templates a theme uses, with readable names.

use mimalloc::MiMalloc;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

use clap::{Parser, Subcommand};
use eyre::WrapErr;
use std::path::PathBuf;
use template_core::listing::{parse_fields, ListOptions};
use template_core::types::{Field, SortOrder};
use tracing_subscriber::{fmt, EnvFilter};
use unique_templates::render::OutputFormat;
use unique_templates::theme::ThemeHost;
use unique_templates::{load_config, name_files, run_list, ThemeOptions};

/// List the unique templates a theme uses.
#[derive(Parser)]
#[command(name = "unique-templates")]
#[command(about = "List the unique templates a theme uses, with human-readable names")]
#[command(version)]
struct Cli {
    /// Active theme directory
    #[arg(long, global = true, default_value = ".")]
    theme: PathBuf,

    /// Parent theme directory (overrides template_dir)
    #[arg(long, global = true)]
    parent_theme: Option<PathBuf>,

    /// Host compat directory searched after the theme (overrides compat_dir)
    #[arg(long, global = true)]
    compat_dir: Option<PathBuf>,

    /// Config file path (applied over <theme>/.unique-templates)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Extra content type to recognise (repeatable)
    #[arg(long = "post-type", global = true)]
    post_types: Vec<String>,

    /// Extra taxonomy to recognise (repeatable)
    #[arg(long = "taxonomy", global = true)]
    taxonomies: Vec<String>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List the unique templates of the theme
    List {
        /// Comma-separated fields to show: name, filename, url, or all
        #[arg(long, default_value = "all")]
        fields: String,

        /// Field to sort by: name, filename, or url
        #[arg(long, value_parser = parse_orderby, default_value = "filename")]
        orderby: Field,

        /// Sort order: asc or desc
        #[arg(long, value_parser = parse_order, default_value = "asc")]
        order: SortOrder,

        /// Output format: table, json, yaml, or count
        #[arg(long, value_parser = parse_format, default_value = "table")]
        format: OutputFormat,
    },

    /// Print the name of each template file
    Name {
        /// Template files, absolute or relative to the theme
        #[arg(required = true)]
        files: Vec<String>,
    },
}

fn parse_orderby(s: &str) -> Result<Field, String> {
    Field::from_name(&s.to_lowercase()).ok_or_else(|| {
        format!(
            "invalid orderby '{}', expected: name, filename, url",
            s
        )
    })
}

fn parse_order(s: &str) -> Result<SortOrder, String> {
    match s.to_lowercase().as_str() {
        "asc" => Ok(SortOrder::Asc),
        "desc" => Ok(SortOrder::Desc),
        _ => Err(format!("invalid order '{}', expected: asc, desc", s)),
    }
}

fn parse_format(s: &str) -> Result<OutputFormat, String> {
    match s.to_lowercase().as_str() {
        "table" => Ok(OutputFormat::Table),
        "json" => Ok(OutputFormat::Json),
        "yaml" => Ok(OutputFormat::Yaml),
        "count" => Ok(OutputFormat::Count),
        _ => Err(format!(
            "invalid format '{}', expected: table, json, yaml, count",
            s
        )),
    }
}

fn main() {
    let cli = Cli::parse();

    // Initialize tracing. Logs go to stderr so stdout stays machine-readable.
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(cli) {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> eyre::Result<()> {
    let options = ThemeOptions {
        theme: cli.theme,
        parent_theme: cli.parent_theme,
        compat_dir: cli.compat_dir,
        config: cli.config,
        post_types: cli.post_types,
        taxonomies: cli.taxonomies,
    };

    let config = load_config(&options).wrap_err("failed to load config")?;
    let host = ThemeHost::open(&options.theme, &config)?;

    match cli.command {
        Command::List {
            fields,
            orderby,
            order,
            format,
        } => {
            let list_options = ListOptions {
                fields: parse_fields(&fields),
                orderby,
                order,
            };
            tracing::debug!(
                fields = %fields,
                orderby = orderby.as_str(),
                order = order.as_str(),
                format = format.as_str(),
                "listing templates"
            );
            let output = run_list(&host, &config, &list_options, format)?;
            print!("{output}");
        }
        Command::Name { files } => {
            for name in name_files(&host, &config, &files) {
                println!("{name}");
            }
        }
    }

    Ok(())
}
