//! mlrdoc — generate Miller's manual page or reference docs from `mlr` itself.
//!
//! `mlrdoc > mlr.1` writes the man page; `mlrdoc functions -f md` writes the
//! built-in function reference as Markdown.

use anyhow::{Context, Result};
use clap::Parser;
use mlrdoc::driver::{Generator, ItemErrorPolicy, Page};
use mlrdoc::introspect::ProcessIntrospector;
use mlrdoc::names::{NameResolver, NameTable};
use mlrdoc::render;
use std::io;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "mlrdoc",
    about = "Generate Miller's manual page and reference documents from its help output"
)]
struct Cli {
    /// Document to generate
    #[arg(value_enum, default_value = "manpage")]
    page: Page,

    /// Output format: troff (default), markdown, rst
    #[arg(short = 'f', long, default_value = "troff")]
    format: String,

    /// Command to query, split like a shell would
    #[arg(long, default_value = "mlr")]
    mlr: String,

    /// Date stamped into the man page header (default: today, UTC)
    #[arg(long)]
    date: Option<String>,

    /// Leave out items whose help query fails instead of aborting
    #[arg(long)]
    skip_failed_items: bool,

    /// Write to this file instead of stdout; a directory gets a file named
    /// after the page
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,

    /// Log every query
    #[arg(short = 'v', long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let encoder = render::create_encoder(&cli.format)?;
    let client = ProcessIntrospector::miller(&cli.mlr)?;
    let resolver = NameResolver::new(NameTable::builtin(encoder.dialect()));
    let policy = if cli.skip_failed_items {
        ItemErrorPolicy::Skip
    } else {
        ItemErrorPolicy::Abort
    };
    let date = cli
        .date
        .clone()
        .unwrap_or_else(|| chrono::Utc::now().format("%Y-%m-%d").to_string());

    let doc = Generator::new(&client, &resolver)
        .with_item_errors(policy)
        .with_date(date)
        .build(cli.page)
        .with_context(|| format!("failed to generate the {:?} document", cli.page))?;

    // Rendered in full before anything is written, so a failed run leaves no
    // partial document behind.
    let text = encoder.encode(&doc).context("failed to render document")?;

    let path = render::output_path(cli.output.as_deref(), cli.page.file_stem(), encoder.as_ref());
    render::write_document(&text, path.as_deref()).with_context(|| match path {
        Some(ref path) => format!("failed to write {}", path.display()),
        None => "failed to write stdout".to_string(),
    })?;
    tracing::info!(bytes = text.len(), "document written");
    Ok(())
}

/// Log to stderr; `RUST_LOG` overrides the default level.
fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}
