//! Standalone serving-core binary.
//!
//! Runs the core with the default echo handler. The four launch
//! parameters mirror what a process manager would pass: bind address and
//! port, worker count, threads per worker, and the request timeout.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;

use gantry::config::{self, ConfigError, ServerConfig};
use gantry::handler::{EchoHandler, Handler};
use gantry::http::HttpServer;
use gantry::lifecycle::{signals, Shutdown};
use gantry::net::Listener;
use gantry::observability;

#[derive(Parser)]
#[command(name = "gantry", about = "Bounded-concurrency HTTP serving core", version)]
struct Cli {
    /// Path to a TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Host to bind.
    #[arg(long)]
    bind: Option<String>,

    /// Port to listen on (overrides the PORT environment variable).
    #[arg(short, long)]
    port: Option<u16>,

    /// Worker count (process-level parallelism).
    #[arg(short, long)]
    workers: Option<usize>,

    /// Concurrent thread slots per worker.
    #[arg(short, long)]
    threads: Option<usize>,

    /// Maximum handler execution time in seconds; 0 means unbounded.
    #[arg(long, value_name = "SECS")]
    request_timeout: Option<u64>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => config::load_config(path)?,
        None => ServerConfig::default(),
    };
    if let Some(bind) = cli.bind {
        config.listener.bind_host = bind;
    }
    if let Some(workers) = cli.workers {
        config.pool.workers = workers;
    }
    if let Some(threads) = cli.threads {
        config.pool.threads_per_worker = threads;
    }
    if let Some(secs) = cli.request_timeout {
        // 0 keeps the process-manager convention: never force-kill a request.
        config.timeouts.request_secs = if secs == 0 { None } else { Some(secs) };
    }

    observability::logging::init(&config.observability.log_level);
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "gantry starting");

    // The port comes from the runtime environment unless overridden;
    // absence everywhere is a fatal configuration error.
    let env_port = std::env::var("PORT").ok();
    config.listener.port = Some(config::resolve_port(
        cli.port,
        env_port.as_deref(),
        config.listener.port,
    )?);
    config::validation::validate_config(&config).map_err(ConfigError::Validation)?;

    tracing::info!(
        bind_host = %config.listener.bind_host,
        port = config.listener.port.unwrap_or(0),
        workers = config.pool.workers,
        threads_per_worker = config.pool.threads_per_worker,
        request_timeout = ?config.timeouts.request(),
        "Configuration loaded"
    );

    // Bind failure (port taken, unauthorized) is fatal: non-zero exit.
    let listener = Listener::bind(&config.listener).await?;

    let shutdown = Shutdown::new();
    let receiver = shutdown.subscribe();
    tokio::spawn(async move {
        signals::wait_for_termination().await;
        shutdown.trigger();
    });

    let server = HttpServer::new(config, || Arc::new(EchoHandler::new()) as Arc<dyn Handler>);
    server.run(listener, receiver).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
