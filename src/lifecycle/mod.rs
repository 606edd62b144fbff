//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → Shutdown::trigger()
//!
//! Shutdown (shutdown.rs):
//!     trigger → accept loop stops → keep-alive drained → busy slots
//!     finish (no deadline) → process exits
//! ```
//!
//! # Design Decisions
//! - Ordered shutdown: stop accept, drain, close
//! - No drain deadline: a long-running request is never force-killed at
//!   shutdown, consistent with the unbounded request timeout

pub mod shutdown;
pub mod signals;

pub use shutdown::Shutdown;
