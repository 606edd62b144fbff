//! HTTP server: accept loop, per-connection tasks, graceful drain.
//!
//! # Responsibilities
//! - Own the worker pool and the connection tracker
//! - Accept connections until the shutdown signal fires
//! - Serve HTTP/1.1 (with keep-alive) on each connection via hyper
//! - On shutdown: stop accepting immediately, end keep-alive on open
//!   connections, then wait without a deadline for in-flight work

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use tokio::net::TcpStream;
use tokio::sync::{broadcast, watch};

use crate::config::ServerConfig;
use crate::handler::Handler;
use crate::http::dispatch;
use crate::net::{ConnectionGuard, ConnectionTracker, Listener};
use crate::pool::WorkerPool;

/// The serving core: one listener, one worker pool, one handler per worker.
pub struct HttpServer {
    config: ServerConfig,
    pool: Arc<WorkerPool>,
    tracker: ConnectionTracker,
}

impl HttpServer {
    /// Build the server. The factory runs once per worker so each worker
    /// owns its handler instance.
    pub fn new(config: ServerConfig, handler_factory: impl Fn() -> Arc<dyn Handler>) -> Self {
        let pool = Arc::new(WorkerPool::new(
            config.pool.workers,
            config.pool.threads_per_worker,
            handler_factory,
        ));
        Self {
            config,
            pool,
            tracker: ConnectionTracker::new(),
        }
    }

    /// Slot pool, exposed for observation.
    pub fn pool(&self) -> &Arc<WorkerPool> {
        &self.pool
    }

    /// Run the server until the shutdown signal fires, then drain.
    ///
    /// Draining stops the accept loop at once, ends keep-alive on every
    /// open connection, and waits for all in-flight requests to finish.
    /// There is no drain deadline, mirroring the unbounded request timeout.
    pub async fn run(
        self,
        listener: Listener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr();
        tracing::info!(
            address = %addr,
            capacity = self.pool.capacity(),
            request_timeout = ?self.config.timeouts.request(),
            "HTTP server starting"
        );

        let (drain_tx, drain_rx) = watch::channel(false);

        loop {
            tokio::select! {
                _ = shutdown.recv() => {
                    tracing::info!("Shutdown signal received; no longer accepting connections");
                    break;
                }
                accepted = listener.accept() => match accepted {
                    Ok((stream, peer)) => {
                        let guard = self.tracker.track();
                        let pool = Arc::clone(&self.pool);
                        let request_timeout = self.config.timeouts.request();
                        let drain_rx = drain_rx.clone();
                        tokio::spawn(serve_connection(
                            stream,
                            peer,
                            guard,
                            pool,
                            request_timeout,
                            drain_rx,
                        ));
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "Accept failed");
                    }
                }
            }
        }

        // Closing the socket first makes new connection attempts fail
        // immediately while existing ones drain.
        drop(listener);
        let _ = drain_tx.send(true);

        tracing::info!(
            active_connections = self.tracker.active_count(),
            in_flight = self.pool.in_flight(),
            "Draining"
        );
        self.tracker.wait_idle().await;
        self.pool.wait_idle().await;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Serve one connection until it closes or drain ends its keep-alive.
async fn serve_connection(
    stream: TcpStream,
    peer: SocketAddr,
    guard: ConnectionGuard,
    pool: Arc<WorkerPool>,
    request_timeout: Option<Duration>,
    mut drain_rx: watch::Receiver<bool>,
) {
    let connection_id = guard.id();
    let io = TokioIo::new(stream);
    let service = service_fn(move |req| {
        let pool = Arc::clone(&pool);
        dispatch::dispatch(pool, request_timeout, req)
    });

    let conn = http1::Builder::new().serve_connection(io, service);
    tokio::pin!(conn);

    let mut draining = *drain_rx.borrow();
    if draining {
        conn.as_mut().graceful_shutdown();
    }

    loop {
        tokio::select! {
            result = conn.as_mut() => {
                if let Err(e) = result {
                    tracing::debug!(
                        connection_id = %connection_id,
                        peer_addr = %peer,
                        error = %e,
                        "Connection ended with error"
                    );
                }
                break;
            }
            changed = drain_rx.changed(), if !draining => {
                draining = true;
                if changed.is_ok() && *drain_rx.borrow() {
                    // Finish in-flight requests, then close instead of
                    // waiting for the next keep-alive request.
                    conn.as_mut().graceful_shutdown();
                }
            }
        }
    }

    drop(guard);
}
