//! ercache - crawl the published election results, cache every document,
//! and flatten election returns into a CSV of per-candidate votes.

use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use ercache_core::export::write_csv_file;
use ercache_core::pipeline::{build_fetcher, run};
use ercache_core::{Config, PipelineError, RegionWalker, ResultExtractor};

#[derive(Parser, Debug)]
#[command(name = "ercache", version, about)]
struct Cli {
    /// Config file (defaults to ~/.config/ercache/config.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Cache directory override
    #[arg(long, global = true)]
    cache_dir: Option<PathBuf>,

    /// Revalidate cached documents with conditional requests
    #[arg(long, global = true)]
    revalidate: bool,

    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fetch the root region and every child's precinct document
    Crawl {
        #[arg(long)]
        root: Option<String>,
    },
    /// Flatten cached precinct documents into a CSV
    Extract {
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Crawl, then extract
    Run {
        #[arg(long)]
        root: Option<String>,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

/// Gateway failures leave everything fetched so far in the cache.
fn note_resumable(err: &PipelineError) {
    if err.is_transient() {
        warn!("The mirror kept failing; fetched documents are cached, re-run to resume");
    }
}

/// Initialize the tracing subscriber for logging
fn init_tracing(verbose: bool) {
    // RUST_LOG wins over --verbose
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut config = Config::load(cli.config.as_deref()).context("Failed to load config")?;
    if let Some(dir) = cli.cache_dir {
        config.cache_dir = Some(dir);
    }
    if cli.revalidate {
        config.revalidate = true;
    }

    let fetcher = build_fetcher(&config)?;
    info!(cache = %fetcher.cache().cache_dir().display(), base = fetcher.api().base_url(), "ercache starting");

    match cli.command {
        Command::Crawl { root } => {
            let root = root.unwrap_or_else(|| config.root_code.clone());
            let report = RegionWalker::new(&fetcher)
                .walk(&root)
                .await
                .inspect_err(note_resumable)
                .with_context(|| format!("Crawl of region {} failed", root))?;
            info!(root = %report.root_code, children = report.children, "Crawl complete");
        }
        Command::Extract { output } => {
            let output = output.unwrap_or_else(|| config.output.clone());
            let records = ResultExtractor::new(&fetcher)
                .extract()
                .await
                .context("Extraction failed")?;
            write_csv_file(&output, &records)?;
            eprintln!("Results saved to {}", output.display());
        }
        Command::Run { root, output } => {
            let root = root.unwrap_or_else(|| config.root_code.clone());
            let output = output.unwrap_or_else(|| config.output.clone());
            let records = run(&fetcher, &root)
                .await
                .inspect_err(note_resumable)
                .with_context(|| format!("Run for region {} failed", root))?;
            write_csv_file(&output, &records)?;
            eprintln!("Results saved to {}", output.display());
        }
    }

    Ok(())
}
