//! Notes REST service
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request
//!     ──────────────▶ http::server ──▶ handler (INFO scope, blocking thread)
//!                                          │
//!                                          ▼
//!                                    notes::service (DEBUG scope)
//!                                          │
//!                                          ▼
//!                                    notes::repository ──▶ SQLite
//!
//!     Every log line carries the thread's diagnostic context
//!     (observability::mdc) through observability::logging.
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;

use notes_service::config::{load_config, override_bind_address, ServiceConfig};
use notes_service::lifecycle::{signals, Shutdown};
use notes_service::notes::{NoteService, SqliteNoteRepository};
use notes_service::observability::logging::init_logging;
use notes_service::HttpServer;

#[derive(Parser)]
#[command(name = "notes-service")]
#[command(about = "REST service for notes", long_about = None)]
struct Args {
    /// Path to a TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the listener bind address.
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => ServiceConfig::default(),
    };
    if let Some(bind) = args.bind {
        config = override_bind_address(config, bind)?;
    }

    init_logging(&config.observability)?;

    tracing::info!("notes-service v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        database = %config.database.path,
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    let repository = if config.database.is_in_memory() {
        SqliteNoteRepository::open_in_memory()?
    } else {
        SqliteNoteRepository::open(&config.database.path)?
    };
    let notes = NoteService::new(Arc::new(repository));

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(
        address = %listener.local_addr()?,
        "Listening for connections"
    );

    let shutdown = Shutdown::new();
    let server = HttpServer::new(config, notes);
    let server_task = tokio::spawn(server.run(listener, shutdown.subscribe()));

    signals::forward_signals(&shutdown).await;
    server_task.await??;

    tracing::info!("Shutdown complete");
    Ok(())
}
