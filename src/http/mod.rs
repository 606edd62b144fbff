//! HTTP serving layer.
//!
//! # Data Flow
//! ```text
//! accepted TCP stream
//!     → server.rs (per-connection task, HTTP/1.1 via hyper)
//!     → dispatch.rs (slot claim, body buffering, handler invocation)
//!     → response.rs (canned responses for slot-boundary failures)
//! ```
//!
//! # Design Decisions
//! - One hyper connection task per accepted stream; keep-alive requests
//!   on the same connection are served in order
//! - Concurrency is bounded at the request level by the slot pool, not at
//!   the accept path
//! - A draining signal ends keep-alive on every open connection without
//!   interrupting in-flight requests

pub mod dispatch;
pub mod response;
pub mod server;

pub use server::HttpServer;
