//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from config files.

use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Root configuration for the serving core.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ServerConfig {
    /// Listener configuration (bind host and port).
    pub listener: ListenerConfig,

    /// Worker / thread-slot pool sizing.
    pub pool: PoolConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Host to bind (e.g. "0.0.0.0").
    pub bind_host: String,

    /// Port to bind. Usually supplied by the `PORT` environment variable
    /// or the `--port` flag rather than the file.
    pub port: Option<u16>,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_host: "0.0.0.0".to_string(),
            port: None,
        }
    }
}

impl ListenerConfig {
    /// Resolve to a socket address. The port must already be resolved.
    pub fn socket_addr(&self) -> Result<SocketAddr, String> {
        let host: IpAddr = self
            .bind_host
            .parse()
            .map_err(|e| format!("invalid bind_host {:?}: {}", self.bind_host, e))?;
        let port = self.port.ok_or("port not resolved")?;
        Ok(SocketAddr::new(host, port))
    }
}

/// Worker / thread-slot pool sizing.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PoolConfig {
    /// Number of workers (process-level parallelism).
    pub workers: usize,

    /// Concurrent thread slots per worker.
    pub threads_per_worker: usize,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            workers: 1,
            threads_per_worker: 8,
        }
    }
}

impl PoolConfig {
    /// Total concurrent request capacity.
    pub fn capacity(&self) -> usize {
        self.workers * self.threads_per_worker
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Maximum handler execution time in seconds. `None` means unbounded:
    /// no watchdog ever terminates a running handler. That is the default
    /// and the intended production policy for long-lived responses.
    pub request_secs: Option<u64>,
}

impl TimeoutConfig {
    /// The request timeout as a duration, or `None` for unbounded.
    pub fn request(&self) -> Option<Duration> {
        self.request_secs.map(Duration::from_secs)
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}
