use std::net::SocketAddr;

use anyhow::{Context, Result};
use clap::Parser;
use conncheck::allowlist;
use conncheck::helpers::{bootstrap, logging};
use log::info;

mod routes;

#[derive(Parser)]
#[command(author, version, about)]
struct Cli {
    #[clap(flatten)]
    logging: logging::Params,

    #[clap(flatten)]
    allowlist: allowlist::Params,

    /// Socket address to serve the HTTP API on
    #[arg(long, default_value = "0.0.0.0:8000", env = "LISTEN_ADDR")]
    listen_addr: SocketAddr,
}

fn main() -> Result<()> {
    bootstrap::run(Cli::parse, |cli| &cli.logging, run)
}

async fn run(cli: Cli) -> Result<()> {
    let allowlist = allowlist::read(cli.allowlist).context("Unable to load host allow-list")?;
    info!("Loaded allow-list with {} hosts", allowlist.len());

    let state = routes::AppState::shared(allowlist);
    let router = routes::create_router(state);

    let listener = tokio::net::TcpListener::bind(cli.listen_addr)
        .await
        .with_context(|| format!("Failed to bind to {}", cli.listen_addr))?;
    info!("Serving connectivity API on {}", cli.listen_addr);

    axum::serve(listener, router)
        .await
        .context("HTTP server terminated abnormally")
}
