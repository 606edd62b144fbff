//! TCP listener.
//!
//! # Responsibilities
//! - Bind the configured address
//! - Accept incoming TCP connections
//! - Distinguish fatal bind errors from transient accept errors

use std::net::SocketAddr;

use thiserror::Error;
use tokio::net::{TcpListener, TcpStream};

use crate::config::ListenerConfig;

/// Error type for listener operations.
#[derive(Debug, Error)]
pub enum ListenerError {
    /// Address did not parse or the port is taken/unauthorized. Fatal.
    #[error("failed to bind: {0}")]
    Bind(#[source] std::io::Error),
    /// A single accept failed. Transient; the accept loop continues.
    #[error("failed to accept: {0}")]
    Accept(#[source] std::io::Error),
}

/// The serving core's single listening socket.
pub struct Listener {
    inner: TcpListener,
    local_addr: SocketAddr,
}

impl Listener {
    /// Bind to the configured address.
    ///
    /// Returns [`ListenerError::Bind`] when the port is already in use or
    /// the process may not bind it; callers treat that as fatal.
    pub async fn bind(config: &ListenerConfig) -> Result<Self, ListenerError> {
        let addr: SocketAddr = config
            .socket_addr()
            .map_err(|e| ListenerError::Bind(std::io::Error::new(std::io::ErrorKind::InvalidInput, e)))?;

        let listener = TcpListener::bind(addr).await.map_err(ListenerError::Bind)?;
        let local_addr = listener.local_addr().map_err(ListenerError::Bind)?;

        tracing::info!(address = %local_addr, "Listener bound");

        Ok(Self {
            inner: listener,
            local_addr,
        })
    }

    /// Accept one connection.
    pub async fn accept(&self) -> Result<(TcpStream, SocketAddr), ListenerError> {
        let (stream, peer) = self.inner.accept().await.map_err(ListenerError::Accept)?;
        tracing::debug!(peer_addr = %peer, "Connection accepted");
        Ok((stream, peer))
    }

    /// The address this listener is bound to (resolved, so port 0 becomes
    /// the kernel-assigned port).
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }
}
