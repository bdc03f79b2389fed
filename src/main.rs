//! Catalog search server - serves `GET /search` over catalogs loaded from a JSON file.

use anyhow::{Context, Result};
use catalog_search::catalog::InMemoryCatalog;
use catalog_search::config::SearchConfig;
use catalog_search::engine::SearchEngine;
use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(name = "catalog-search")]
#[command(about = "Search server for package, plugin and category catalogs")]
struct Args {
    /// JSON file with `packages`, `plugins` and `categories` arrays
    #[arg(long)]
    catalog: PathBuf,

    /// JSON engine configuration (result caps, cache TTL)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Port to listen on
    #[arg(short, long, default_value = "8080")]
    port: u16,

    /// Host to bind to
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let log_level = if args.debug { Level::DEBUG } else { Level::INFO };
    FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .compact()
        .init();

    let config = match &args.config {
        Some(path) => SearchConfig::from_json_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => SearchConfig::default(),
    };

    let catalog = InMemoryCatalog::from_json_file(&args.catalog)
        .with_context(|| format!("loading catalog {}", args.catalog.display()))?;
    info!(
        "Loaded {} packages, {} plugins, {} categories",
        catalog.packages.len(),
        catalog.plugins.len(),
        catalog.categories.len()
    );

    let engine = Arc::new(SearchEngine::builder(catalog).config(config).build());

    let addr: SocketAddr = format!("{}:{}", args.host, args.port)
        .parse()
        .context("invalid host or port")?;
    catalog_search::http::serve(engine, addr).await?;
    Ok(())
}
