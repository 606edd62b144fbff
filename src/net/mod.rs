//! Network layer subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming TCP connection
//!     → listener.rs (bind, accept loop)
//!     → connection.rs (lifecycle tracking for drain-at-shutdown)
//!     → Hand off to HTTP layer
//! ```
//!
//! # Design Decisions
//! - Bind failure is fatal; the process must exit non-zero
//! - Accept failures are transient: logged, the loop continues
//! - Connections are accepted without an upper bound; the request-level
//!   slot pool is the concurrency limiter, not the accept path

pub mod connection;
pub mod listener;

pub use connection::{ConnectionGuard, ConnectionId, ConnectionTracker};
pub use listener::{Listener, ListenerError};
