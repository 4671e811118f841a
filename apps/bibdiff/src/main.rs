//! bibdiff
//!
//! Compares bibliography exports from several sources and lists, per
//! publication, which sources hold it and what each one says.

mod render;

use std::io::{self, Write};
use std::path::PathBuf;

use bibdiff_core::{BibdiffConfig, Comparison, RowFilter};
use clap::{Parser, ValueEnum};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "bibdiff", version)]
#[command(about = "Compare bibliography files and show where sources disagree")]
struct Args {
    /// Source files, compared in this order (replaces configured sources)
    files: Vec<PathBuf>,

    /// Config file (default: <config_dir>/bibdiff/config.toml, if present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Keep rows with a record whose author list contains this text
    #[arg(short, long)]
    author: Option<String>,

    /// Four-digit year, or a fragment of the year as written
    #[arg(short, long)]
    year: Option<String>,

    /// Hide publications present in every source
    #[arg(short, long)]
    differences_only: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = Format::Text)]
    format: Format,

    /// Print the distinct years, newest first
    #[arg(long, conflicts_with = "list_authors")]
    list_years: bool,

    /// Print the distinct author surnames
    #[arg(long)]
    list_authors: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Json,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    let config = resolve_config(&args)?;
    let filter = row_filter(&args, &config);
    debug!(?filter, sources = config.sources.len(), "starting comparison");

    let comparison = Comparison::load(&config);
    eprintln!("{}", render::status_line(&comparison.summary()));

    let mut out = io::stdout().lock();
    let json = args.format == Format::Json;

    if args.list_years {
        render::write_list(&mut out, &comparison.index().years_descending(), json)?;
    } else if args.list_authors {
        render::write_list(&mut out, &comparison.index().surnames_sorted(), json)?;
    } else {
        let names = comparison.source_names();
        let rows = comparison.select(&filter);
        match args.format {
            Format::Text => render::write_text(&mut out, &names, &rows)?,
            Format::Json => render::write_json(&mut out, &names, &rows)?,
        }
    }

    out.flush()?;
    Ok(())
}

/// Config from `--config`, else the default location, else empty; file
/// arguments replace its sources.
fn resolve_config(args: &Args) -> bibdiff_core::Result<BibdiffConfig> {
    let path = args
        .config
        .clone()
        .or_else(|| BibdiffConfig::default_path().filter(|p| p.exists()));

    let mut config = match path {
        Some(path) => BibdiffConfig::load(&path)?,
        None => BibdiffConfig::default(),
    };

    if !args.files.is_empty() {
        config.sources = BibdiffConfig::from_paths(args.files.iter().cloned()).sources;
    }

    config.validate()?;
    Ok(config)
}

/// Config filter defaults, overridden by command-line values
fn row_filter(args: &Args, config: &BibdiffConfig) -> RowFilter {
    let mut filter = RowFilter::from(&config.filter);
    if let Some(author) = &args.author {
        filter.author = author.clone();
    }
    if let Some(year) = &args.year {
        filter.year = year.clone();
    }
    filter.differences_only |= args.differences_only;
    filter
}
