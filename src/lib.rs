//! Bounded-concurrency HTTP serving core.
//!
//! Gantry is the generic shell around an application: it owns one listener,
//! a fixed pool of workers (each hosting a fixed number of thread slots and
//! its own handler instance), and nothing else. Every request passes through
//! exactly one handler invocation; the handler itself is an injected
//! collaborator.
//!
//! # Architecture Overview
//!
//! ```text
//!                        ┌───────────────────────────────────────────────┐
//!                        │                 SERVING CORE                  │
//!                        │                                               │
//!   Client Request       │  ┌─────────┐   ┌─────────┐   ┌────────────┐  │
//!   ─────────────────────┼─▶│   net   │──▶│  http   │──▶│    pool    │  │
//!                        │  │listener │   │ server  │   │ slot claim │  │
//!                        │  └─────────┘   └─────────┘   └─────┬──────┘  │
//!                        │                                    │         │
//!                        │                                    ▼         │
//!   Client Response      │  ┌─────────┐   ┌─────────┐   ┌────────────┐  │
//!   ◀────────────────────┼──│response │◀──│dispatch │◀──│  handler   │◀─┼── Application
//!                        │  │  write  │   │boundary │   │ (pluggable)│  │
//!                        │  └─────────┘   └─────────┘   └────────────┘  │
//!                        │                                               │
//!                        │  ┌─────────────────────────────────────────┐  │
//!                        │  │          Cross-Cutting Concerns         │  │
//!                        │  │  ┌────────┐ ┌──────────┐ ┌───────────┐  │  │
//!                        │  │  │ config │ │lifecycle │ │ observa-  │  │  │
//!                        │  │  │        │ │sig/drain │ │ bility    │  │  │
//!                        │  │  └────────┘ └──────────┘ └───────────┘  │  │
//!                        │  └─────────────────────────────────────────┘  │
//!                        └───────────────────────────────────────────────┘
//! ```
//!
//! # Concurrency contract
//!
//! - In-flight requests never exceed `workers × threads_per_worker`
//!   (default 1 × 8). The extra request waits in a FIFO queue for a slot;
//!   it does not spawn additional concurrency.
//! - The per-request timeout defaults to *unbounded*: no watchdog ever
//!   terminates a slot because of elapsed time. A finite timeout is an
//!   explicit opt-in.
//! - Graceful shutdown stops accepting immediately and waits, without a
//!   deadline, for every busy slot to finish.

// Core subsystems
pub mod config;
pub mod handler;
pub mod http;
pub mod net;
pub mod pool;

// Cross-cutting concerns
pub mod lifecycle;
pub mod observability;

pub use config::schema::ServerConfig;
pub use handler::{Handler, HandlerError, Request, Response};
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use pool::WorkerPool;
