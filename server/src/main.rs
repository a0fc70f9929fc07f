//! folio server
//!
//! Serves one owner's public portfolio snapshot behind an opaque share
//! token, and a small admin API for rotating and toggling that token.
//!
//! Usage:
//!   folio-server --database folio.db --base-url https://folio.example
//!
//! The owner id is stable across restarts when passed via `--owner`;
//! otherwise a fresh one is generated and printed.

use std::{path::PathBuf, sync::Arc};

use anyhow::{Context, Result};
use clap::Parser;
use folio_resolver::ShareLinkManager;
use folio_server::{AppState, build_router};
use folio_store::SqliteStore;
use folio_types::OwnerId;
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(name = "folio-server")]
#[command(about = "Read-only shared portfolio server")]
struct Args {
    /// Port to listen on
    #[arg(short, long, default_value = "8080")]
    port: u16,

    /// Path to the SQLite database
    #[arg(short, long, default_value = "folio.db")]
    database: PathBuf,

    /// Public base URL used when building share links
    #[arg(long, default_value = "http://localhost:8080")]
    base_url: String,

    /// Owner account id (UUID); generated when omitted
    #[arg(long)]
    owner: Option<String>,

    /// Enable verbose debug logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let log_level = if args.verbose { Level::DEBUG } else { Level::INFO };
    FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .compact()
        .init();

    info!("folio server starting...");

    let owner = match &args.owner {
        Some(raw) => OwnerId::parse(raw).context("invalid --owner id")?,
        None => {
            let owner = OwnerId::new();
            info!("generated owner id: {owner} (pass --owner to keep it)");
            owner
        }
    };

    let store = Arc::new(
        SqliteStore::open(&args.database)
            .with_context(|| format!("opening database {}", args.database.display()))?,
    );
    let manager = Arc::new(ShareLinkManager::new(store.clone(), args.base_url.clone()));
    let state = AppState {
        backend: store,
        manager,
        owner,
    };

    let app = build_router(state);
    let listener = tokio::net::TcpListener::bind(("0.0.0.0", args.port))
        .await
        .with_context(|| format!("binding port {}", args.port))?;

    info!("listening on port {}", args.port);
    info!("share pages served under {}/shared/", args.base_url);

    axum::serve(listener, app).await.context("HTTP server failed")
}
