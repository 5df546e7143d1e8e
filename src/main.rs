//! Stockroom command-line entry point.
//!
//! Run with: `stockroom [--db <PATH>] [--in-memory]`

use anyhow::{Context, Result};
use clap::Parser;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use stockroom::cli::{self, Prompter};
use stockroom::{
    FileProductRepository, FileRepositoryConfig, InMemoryProductRepository, ProductRepository,
    ProductService,
};

/// Interactive inventory manager
#[derive(Parser, Debug)]
#[command(name = "stockroom")]
#[command(about = "Register products and track stock levels", long_about = None)]
#[command(version)]
struct Cli {
    /// Path of the inventory document
    #[arg(long, default_value = "inventory.db.json")]
    db: PathBuf,

    /// Keep products in memory only (nothing is written to disk)
    #[arg(long, conflicts_with = "db")]
    in_memory: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_target(false).with_writer(io::stderr))
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let args = Cli::parse();

    let repository: Arc<dyn ProductRepository> = if args.in_memory {
        Arc::new(InMemoryProductRepository::new())
    } else {
        let repo = FileProductRepository::open(FileRepositoryConfig::at(&args.db))
            .with_context(|| format!("failed to open inventory at {}", args.db.display()))?;
        Arc::new(repo)
    };

    let service = ProductService::new(repository);
    let stdin = io::stdin();
    let mut prompter = Prompter::new(stdin.lock(), io::stdout());

    cli::run(&service, &mut prompter).context("terminal I/O failed")?;
    Ok(())
}
