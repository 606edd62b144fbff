//! Shared utilities for integration testing.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use tokio::task::JoinHandle;

use gantry::config::ServerConfig;
use gantry::handler::Handler;
use gantry::http::HttpServer;
use gantry::lifecycle::Shutdown;
use gantry::net::Listener;
use gantry::pool::WorkerPool;

/// A serving core running on an ephemeral port.
pub struct TestCore {
    pub addr: SocketAddr,
    pub pool: Arc<WorkerPool>,
    pub shutdown: Shutdown,
    pub server: JoinHandle<Result<(), std::io::Error>>,
}

impl TestCore {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

/// Start a core with the given pool shape and handler on 127.0.0.1:0.
pub async fn spawn_core(
    workers: usize,
    threads_per_worker: usize,
    request_secs: Option<u64>,
    handler: Arc<dyn Handler>,
) -> TestCore {
    let mut config = ServerConfig::default();
    config.listener.bind_host = "127.0.0.1".into();
    config.listener.port = Some(0);
    config.pool.workers = workers;
    config.pool.threads_per_worker = threads_per_worker;
    config.timeouts.request_secs = request_secs;

    let listener = Listener::bind(&config.listener).await.unwrap();
    let addr = listener.local_addr();

    let shutdown = Shutdown::new();
    let receiver = shutdown.subscribe();
    let server = HttpServer::new(config, move || Arc::clone(&handler));
    let pool = Arc::clone(server.pool());
    let server = tokio::spawn(async move { server.run(listener, receiver).await });

    TestCore {
        addr,
        pool,
        shutdown,
        server,
    }
}

/// HTTP client that neither pools nor proxies, so each request opens a
/// fresh connection.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}

/// Tracks current and peak concurrent entries; handlers call enter/exit
/// around their work so tests can observe slot occupancy.
#[derive(Debug, Default)]
#[allow(dead_code)]
pub struct OccupancyGauge {
    current: AtomicUsize,
    peak: AtomicUsize,
}

#[allow(dead_code)]
impl OccupancyGauge {
    pub fn enter(&self) {
        let now = self.current.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
    }

    pub fn exit(&self) {
        self.current.fetch_sub(1, Ordering::SeqCst);
    }

    pub fn current(&self) -> usize {
        self.current.load(Ordering::SeqCst)
    }

    pub fn peak(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }
}
