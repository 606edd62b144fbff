//! Per-request dispatch through the slot pool.
//!
//! # Responsibilities
//! - Queue each request for a free thread slot (unbounded FIFO wait)
//! - Buffer the complete request body inside the claimed slot
//! - Invoke the handler exactly once per request
//! - Convert handler errors and panics to a generic 500 at the slot
//!   boundary; the slot is released on every exit path
//!
//! # Cancellation contract
//! - Client disconnect before the full request is read drops this future:
//!   the slot releases and the handler never runs
//! - Client disconnect while the handler runs does NOT preempt it: the
//!   handler finishes on a detached task and the response is discarded

use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;

use futures_util::FutureExt;
use http_body_util::{BodyExt, Full};
use hyper::body::{Bytes, Incoming};
use uuid::Uuid;

use crate::handler::Request;
use crate::http::response;
use crate::pool::{SlotPermit, WorkerPool};

/// Serve one request end to end.
pub(crate) async fn dispatch(
    pool: Arc<WorkerPool>,
    request_timeout: Option<Duration>,
    req: hyper::Request<Incoming>,
) -> Result<hyper::Response<Full<Bytes>>, hyper::Error> {
    let request_id = Uuid::new_v4();
    let method = req.method().clone();
    let path = req.uri().path().to_string();

    // Suspend here while all slots are busy. The wait is unbounded and
    // FIFO; nothing is rejected for queuing.
    let permit = pool.claim().await;

    tracing::debug!(
        request_id = %request_id,
        method = %method,
        path = %path,
        worker = %permit.worker_id(),
        in_flight = pool.in_flight(),
        "Slot claimed"
    );

    // Read the complete request inside the slot. An error here means the
    // client went away mid-read: discard the partial request, attempt no
    // response, let hyper tear the connection down. The permit drops with
    // this frame.
    let (parts, body) = req.into_parts();
    let body = match body.collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(e) => {
            tracing::debug!(
                request_id = %request_id,
                error = %e,
                "Client disconnected before the request was fully read"
            );
            return Err(e);
        }
    };
    let request = Request::from_parts(parts, body);

    // The handler runs on its own task so that losing the client does not
    // preempt it; the task owns the permit and frees the slot on natural
    // completion even when nobody is left to read the response.
    let slot_task = tokio::spawn(run_in_slot(permit, request, request_timeout, request_id));

    match slot_task.await {
        Ok(res) => Ok(res),
        Err(e) => {
            // The slot task catches handler panics itself, so this only
            // fires on runtime teardown.
            tracing::error!(request_id = %request_id, error = %e, "Slot task vanished");
            Ok(response::internal_error())
        }
    }
}

/// Invoke the handler inside a claimed slot.
///
/// Exactly one handler invocation per request, unwind-caught so a panicking
/// handler is indistinguishable from one returning an error.
async fn run_in_slot(
    permit: SlotPermit,
    request: Request,
    request_timeout: Option<Duration>,
    request_id: Uuid,
) -> hyper::Response<Full<Bytes>> {
    let handler = permit.handler();
    let invocation = AssertUnwindSafe(handler.handle(request)).catch_unwind();

    let outcome = match request_timeout {
        // Unbounded: the handler runs for as long as it needs. No watchdog.
        None => invocation.await,
        Some(limit) => match tokio::time::timeout(limit, invocation).await {
            Ok(outcome) => outcome,
            Err(_) => {
                tracing::warn!(
                    request_id = %request_id,
                    limit = ?limit,
                    "Handler exceeded the configured request timeout"
                );
                return response::handler_timeout();
            }
        },
    };

    match outcome {
        Ok(Ok(res)) => {
            let (parts, body) = res.into_parts();
            hyper::Response::from_parts(parts, Full::new(body))
        }
        Ok(Err(error)) => {
            tracing::error!(request_id = %request_id, error = %error, "Handler failed");
            response::internal_error()
        }
        Err(panic) => {
            tracing::error!(
                request_id = %request_id,
                panic = panic_message(panic.as_ref()),
                "Handler panicked"
            );
            response::internal_error()
        }
    }
    // permit drops here: the slot is free again on every path above
}

fn panic_message(panic: &(dyn std::any::Any + Send)) -> &str {
    if let Some(s) = panic.downcast_ref::<&str>() {
        s
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.as_str()
    } else {
        "<non-string panic payload>"
    }
}
