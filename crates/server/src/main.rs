//! ketto MCP server entry point.
//!
//! Boots the MCP server on stdio transport.
//! Logging goes to stderr to avoid interfering with the JSON-RPC protocol on stdout.

use std::sync::Arc;

use anyhow::{Context, Result};
use ketto_client::NetkeibaSource;
use ketto_core::{AppConfig, CacheDb, PedigreeMatcher, PedigreeSearch, PositionIndex, ResultCache};
use rmcp::service::serve_server;
use rmcp::transport::io::stdio;
use tracing_subscriber::EnvFilter;

mod error;
mod handler;
mod tools;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .json()
        .init();

    let config = AppConfig::load().context("failed to load configuration")?;
    tracing::info!(db_path = %config.db_path.display(), sheet = %config.sheet_name, "Starting ketto server on stdio transport");

    let db = CacheDb::open(&config.db_path).await?;
    let source = NetkeibaSource::from_config(&config)?;
    let search = PedigreeSearch::new(
        Arc::new(ResultCache::new(db.table(config.sheet_name.clone()))),
        source,
        PedigreeMatcher::new(Arc::new(PositionIndex::default())).with_max_depth(config.pedigree_depth),
    )
    .with_request_delay(config.request_delay());

    let handler = handler::KettoServer::new(search);
    let transport = stdio();
    let server = serve_server(handler, transport).await?;

    server.waiting().await?;

    Ok(())
}
