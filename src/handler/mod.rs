//! Pluggable application handler contract.
//!
//! # Data Flow
//! ```text
//! http/dispatch claims a slot
//!     → builds Request (head + fully buffered body)
//!     → Handler::handle(request)
//!     → Ok(Response)            → written to the client
//!     → Err(HandlerError)/panic → generic 500, logged, slot released
//! ```
//!
//! # Design Decisions
//! - The handler is a capability trait, not a concrete type: any
//!   conforming implementation is substitutable without touching the core
//! - Bodies are fully buffered before the handler runs, so the handler
//!   never observes a partially delivered request
//! - Each worker gets its own handler instance from a factory; the core
//!   never shares one instance across workers

use std::future::Future;

use futures_util::future::BoxFuture;
use hyper::body::Bytes;
use thiserror::Error;

pub mod echo;

pub use echo::EchoHandler;

/// A complete inbound request: head plus fully buffered body.
pub type Request = hyper::Request<Bytes>;

/// The handler's reply: status, headers, and a buffered body.
pub type Response = hyper::Response<Bytes>;

/// Error raised by a handler during dispatch.
///
/// The core never forwards the message to the client; it is logged and
/// mapped to a generic 500.
#[derive(Debug, Error)]
#[error("handler failed: {0}")]
pub struct HandlerError(pub Box<dyn std::error::Error + Send + Sync>);

impl HandlerError {
    /// Build a handler error from a plain message.
    pub fn msg(message: impl Into<String>) -> Self {
        Self(message.into().into())
    }
}

/// The application-side collaborator invoked once per request.
///
/// Implementations must be safe to call from concurrent thread slots of
/// the owning worker.
pub trait Handler: Send + Sync + 'static {
    /// Convert one request into one response, possibly failing.
    fn handle(&self, request: Request) -> BoxFuture<'_, Result<Response, HandlerError>>;
}

/// Adapt an async closure into a [`Handler`].
///
/// Mostly useful in tests and small embeddings:
///
/// ```no_run
/// use gantry::handler::{handler_fn, Response};
/// use hyper::body::Bytes;
///
/// let handler = handler_fn(|_req| async {
///     Ok(Response::new(Bytes::from_static(b"ok")))
/// });
/// # let _ = handler;
/// ```
pub fn handler_fn<F, Fut>(f: F) -> HandlerFn<F>
where
    F: Fn(Request) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Response, HandlerError>> + Send + 'static,
{
    HandlerFn { f }
}

/// See [`handler_fn`].
pub struct HandlerFn<F> {
    f: F,
}

impl<F, Fut> Handler for HandlerFn<F>
where
    F: Fn(Request) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Response, HandlerError>> + Send + 'static,
{
    fn handle(&self, request: Request) -> BoxFuture<'_, Result<Response, HandlerError>> {
        Box::pin((self.f)(request))
    }
}
