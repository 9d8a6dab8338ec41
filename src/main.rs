//! Grid map service (v1)
//!
//! Serves maps, the observers placed on them and the obstacles blocking
//! their view, as plain JSON or Mason hypermedia.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request
//!     ───────────────▶ http server ──▶ api handlers ──▶ validation
//!                      (request id,        │                │
//!                       trace, timeout,    ▼                ▼
//!                       body limit)     cache ◀──────── store (RwLock)
//!                                          │                │
//!     Client Response                      ▼                ▼
//!     ◀─────────────── JSON / Mason ◀── hypermedia     snapshot file
//!
//!     Cross-cutting: config, observability (logging, metrics), lifecycle
//! ```

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tokio::net::TcpListener;

use gridmap::config::{load_or_default, GridmapConfig};
use gridmap::management;
use gridmap::observability::{logging, metrics};
use gridmap::{HttpServer, Shutdown};

#[derive(Parser)]
#[command(name = "gridmap")]
#[command(about = "Grid map inventory with a Mason hypermedia API", long_about = None)]
struct Cli {
    /// TOML configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP server (default)
    Serve,
    /// Create an empty inventory snapshot
    InitDb,
    /// Add the documented test map to the snapshot
    Testgen,
    /// Print the payload JSON schemas
    Schemas,
    /// Print example GET responses for the documentation
    Docs,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = load_or_default(cli.config.as_deref())?;

    logging::init_logging(&config.observability.log_level);
    tracing::info!("gridmap v{} starting", env!("CARGO_PKG_VERSION"));

    let snapshot = config.storage.snapshot_path.as_deref();
    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => serve(config).await?,
        Commands::InitDb => {
            if management::init_db(snapshot)? {
                tracing::info!(path = ?snapshot, "Initialized empty snapshot");
            }
        }
        Commands::Testgen => {
            let map = management::testgen(snapshot)?;
            tracing::info!(
                map = %map.slug,
                observers = map.observers.len(),
                obstacles = map.obstacles.len(),
                "Generated test data"
            );
        }
        Commands::Schemas => {
            println!("{}", serde_json::to_string_pretty(&management::schemas())?);
        }
        Commands::Docs => {
            println!("{}", serde_json::to_string_pretty(&management::docs()?)?);
        }
    }
    Ok(())
}

async fn serve(config: GridmapConfig) -> Result<(), Box<dyn std::error::Error>> {
    tracing::info!(
        bind_address = %config.listener.bind_address,
        request_timeout_secs = config.timeouts.request_secs,
        snapshot = ?config.storage.snapshot_path,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(e) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                error = %e,
                "Failed to parse metrics address"
            ),
        }
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    shutdown.trigger_on_signal();

    let server = HttpServer::new(config)?;
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
