//! Observability subsystem.
//!
//! # Design Decisions
//! - Structured logging via `tracing` with field syntax everywhere
//! - Request IDs (UUID v4) attached at dispatch, connection IDs at accept
//! - Log level from `RUST_LOG` when set, otherwise from configuration

pub mod logging;
