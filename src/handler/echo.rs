//! Default application handler for the standalone binary.
//!
//! Reflects the request back to the caller and answers `GET /health` with
//! a JSON status document, so an operator can probe a freshly deployed
//! core before any real application is plugged in.

use futures_util::future::BoxFuture;
use hyper::body::Bytes;
use hyper::header::CONTENT_TYPE;
use hyper::{Method, StatusCode};

use crate::handler::{Handler, HandlerError, Request, Response};

/// Echoes method, path, and body; serves a health probe at `/health`.
#[derive(Debug, Default, Clone)]
pub struct EchoHandler;

impl EchoHandler {
    pub fn new() -> Self {
        Self
    }

    fn health() -> Result<Response, HandlerError> {
        let body = serde_json::json!({
            "status": "healthy",
            "service": env!("CARGO_PKG_NAME"),
        });
        hyper::Response::builder()
            .status(StatusCode::OK)
            .header(CONTENT_TYPE, "application/json")
            .body(Bytes::from(body.to_string()))
            .map_err(|e| HandlerError(e.into()))
    }

    fn echo(request: &Request) -> Result<Response, HandlerError> {
        let mut body = format!("{} {}\n", request.method(), request.uri().path());
        if !request.body().is_empty() {
            body.push_str(&String::from_utf8_lossy(request.body()));
        }
        hyper::Response::builder()
            .status(StatusCode::OK)
            .header(CONTENT_TYPE, "text/plain; charset=utf-8")
            .body(Bytes::from(body))
            .map_err(|e| HandlerError(e.into()))
    }
}

impl Handler for EchoHandler {
    fn handle(&self, request: Request) -> BoxFuture<'_, Result<Response, HandlerError>> {
        Box::pin(async move {
            if request.method() == Method::GET && request.uri().path() == "/health" {
                Self::health()
            } else {
                Self::echo(&request)
            }
        })
    }
}
