//! Canned responses emitted at the slot boundary.
//!
//! Handler failures never leak details to the client; the body is always
//! the generic status text, and the real error goes to the log.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::header::{CONTENT_TYPE, SERVER};
use hyper::StatusCode;

const SERVER_TOKEN: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

fn canned(status: StatusCode, body: &'static str) -> hyper::Response<Full<Bytes>> {
    hyper::Response::builder()
        .status(status)
        .header(SERVER, SERVER_TOKEN)
        .header(CONTENT_TYPE, "text/plain; charset=utf-8")
        .body(Full::new(Bytes::from_static(body.as_bytes())))
        .unwrap_or_else(|_| {
            // Static parts only; the builder cannot fail here.
            hyper::Response::new(Full::new(Bytes::from_static(body.as_bytes())))
        })
}

/// Generic reply for a handler error or panic.
pub fn internal_error() -> hyper::Response<Full<Bytes>> {
    canned(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error")
}

/// Reply when a finite request timeout expires.
pub fn handler_timeout() -> hyper::Response<Full<Bytes>> {
    canned(StatusCode::GATEWAY_TIMEOUT, "Handler Timed Out")
}
