//! Part library inspection tool.
//!
//! A thin wrapper around the partdir library that:
//! 1. Parses command-line arguments
//! 2. Initializes logging
//! 3. Opens the library (one full directory scan)
//! 4. Runs one query and prints the result

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use partdir::{DirSource, PartName, PartSource, SourceConfig};
use std::io::Write;
use std::path::PathBuf;

/// Inspect a directory-backed part library.
#[derive(Debug, Parser)]
#[command(name = "partdir", about = "Inspect a directory-backed part library", version)]
struct Cli {
    /// Library root directory
    #[arg(long, env = "PARTDIR_ROOT", conflicts_with = "config")]
    root: Option<PathBuf>,

    /// JSON configuration file (`{"root": "...", "versioning": true}`)
    #[arg(long, env = "PARTDIR_CONFIG")]
    config: Option<PathBuf>,

    /// Index only revisioned part files (name.part.revN)
    #[arg(long)]
    versioning: bool,

    /// Free-form source options; `useVersioning` enables versioned mode
    #[arg(long, default_value = "")]
    options: String,

    /// Print listings as JSON
    #[arg(long)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List categories
    Categories,

    /// List part names, optionally limited to one category
    Parts {
        /// Category to list; all parts when omitted
        category: Option<String>,
    },

    /// Write part payloads to stdout
    Read {
        /// Part names to read
        #[arg(required = true)]
        names: Vec<String>,

        /// Revision to read, e.g. `rev2` (single name only)
        #[arg(long, conflicts_with = "latest")]
        rev: Option<String>,

        /// Read the newest cached revision of each name
        #[arg(long)]
        latest: bool,
    },

    /// Dump all categories and part names
    Show,
}

impl Cli {
    fn source_config(&self) -> Result<SourceConfig> {
        let config = if let Some(path) = &self.config {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading config {}", path.display()))?;
            serde_json::from_str::<SourceConfig>(&text)
                .with_context(|| format!("parsing config {}", path.display()))?
        } else if let Some(root) = &self.root {
            SourceConfig::new(root)
        } else {
            bail!("no library given; pass --root, --config or set PARTDIR_ROOT");
        };

        let versioning = config.versioning
            || self.versioning
            || SourceConfig::options_enable_versioning(&self.options);
        Ok(config.with_versioning(versioning))
    }
}

fn print_list<T: serde::Serialize + std::fmt::Display>(items: &[T], json: bool) -> Result<()> {
    let mut out = std::io::stdout().lock();
    if json {
        serde_json::to_writer_pretty(&mut out, items)?;
        writeln!(out)?;
    } else {
        for item in items {
            writeln!(out, "{item}")?;
        }
    }
    Ok(())
}

fn read(source: &DirSource, names: &[String], rev: Option<&str>, latest: bool) -> Result<()> {
    if rev.is_some() && names.len() != 1 {
        bail!("--rev needs exactly one part name");
    }

    let payloads = if latest {
        let resolved = names
            .iter()
            .map(|name| {
                source
                    .revisions(name)
                    .into_iter()
                    .next()
                    .with_context(|| format!("{name} not found"))
            })
            .collect::<Result<Vec<PartName>>>()?;
        tracing::debug!("Resolved latest revisions: {resolved:?}");
        source.read_parts(&resolved)?
    } else if let Some(rev) = rev {
        vec![source.read_revision(&names[0], rev)?]
    } else {
        let names: Vec<PartName> = names.iter().map(|name| PartName::new(name.as_str())).collect();
        source.read_parts(&names)?
    };

    let mut out = std::io::stdout().lock();
    for payload in payloads {
        out.write_all(&payload)?;
    }
    out.flush()?;
    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();
    let config = cli.source_config()?;

    tracing::info!(
        "Opening {} (versioning: {})",
        config.root.display(),
        config.versioning
    );
    let source = DirSource::open(config).context("opening part library")?;

    match &cli.command {
        Command::Categories => print_list(&source.categories(), cli.json)?,
        Command::Parts { category } => print_list(
            &source.categorical_part_names(category.as_deref().unwrap_or_default()),
            cli.json,
        )?,
        Command::Read { names, rev, latest } => read(&source, names, rev.as_deref(), *latest)?,
        Command::Show => print!("{source}"),
    }

    Ok(())
}
