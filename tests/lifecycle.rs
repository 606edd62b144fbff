//! Failure recovery, disconnect handling, and graceful shutdown behavior.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use hyper::body::Bytes;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;

use gantry::handler::{handler_fn, EchoHandler, Handler, HandlerError, Response};

mod common;

/// Handler that fails or panics on demand and succeeds elsewhere.
fn faulty_handler() -> Arc<dyn Handler> {
    Arc::new(handler_fn(|req| async move {
        match req.uri().path() {
            "/fail" => Err(HandlerError::msg("database exploded")),
            "/panic" => panic!("handler bug"),
            _ => Ok(Response::new(Bytes::from_static(b"ok"))),
        }
    }))
}

#[tokio::test]
async fn handler_error_becomes_a_generic_500() {
    let core = common::spawn_core(1, 2, None, faulty_handler()).await;
    let client = common::client();

    let res = client.get(core.url("/fail")).send().await.unwrap();
    assert_eq!(res.status(), 500);
    let body = res.text().await.unwrap();
    assert_eq!(body, "Internal Server Error");
    assert!(
        !body.contains("database"),
        "handler error details must not leak to the client"
    );

    // The slot is free again and serving continues.
    let res = client.get(core.url("/ok")).send().await.unwrap();
    assert_eq!(res.status(), 200);

    core.shutdown.trigger();
}

#[tokio::test]
async fn handler_panic_is_recovered_at_the_slot_boundary() {
    let core = common::spawn_core(1, 1, None, faulty_handler()).await;
    let client = common::client();

    let res = client.get(core.url("/panic")).send().await.unwrap();
    assert_eq!(res.status(), 500);

    // With a single slot, a leaked permit would deadlock this request.
    let res = client.get(core.url("/ok")).send().await.unwrap();
    assert_eq!(res.status(), 200);

    core.shutdown.trigger();
}

#[tokio::test]
async fn disconnect_before_full_request_cancels_dispatch() {
    let ran = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&ran);
    let handler: Arc<dyn Handler> = Arc::new(handler_fn(move |_req| {
        let flag = Arc::clone(&flag);
        async move {
            flag.store(true, Ordering::SeqCst);
            Ok(Response::new(Bytes::from_static(b"ok")))
        }
    }));
    let core = common::spawn_core(1, 1, None, handler).await;

    // Promise 64 body bytes, deliver a fraction, then hang up.
    let mut stream = TcpStream::connect(core.addr).await.unwrap();
    stream
        .write_all(b"POST /upload HTTP/1.1\r\nHost: test\r\nContent-Length: 64\r\n\r\npartial")
        .await
        .unwrap();
    drop(stream);

    tokio::time::sleep(Duration::from_millis(300)).await;
    assert!(
        !ran.load(Ordering::SeqCst),
        "handler must never see a partially delivered request"
    );
    assert_eq!(core.pool.in_flight(), 0, "the claimed slot must be released");

    // The single slot is usable again.
    let client = common::client();
    let res = client.get(core.url("/ok")).send().await.unwrap();
    assert_eq!(res.status(), 200);

    core.shutdown.trigger();
}

#[tokio::test]
async fn disconnect_during_handler_does_not_preempt_it() {
    let entered = Arc::new(AtomicBool::new(false));
    let completed = Arc::new(AtomicBool::new(false));
    let entered_flag = Arc::clone(&entered);
    let completed_flag = Arc::clone(&completed);
    let handler: Arc<dyn Handler> = Arc::new(handler_fn(move |_req| {
        let entered = Arc::clone(&entered_flag);
        let completed = Arc::clone(&completed_flag);
        async move {
            entered.store(true, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(500)).await;
            completed.store(true, Ordering::SeqCst);
            Ok(Response::new(Bytes::from_static(b"done")))
        }
    }));
    let core = common::spawn_core(1, 1, None, handler).await;

    let mut stream = TcpStream::connect(core.addr).await.unwrap();
    stream
        .write_all(b"GET /work HTTP/1.1\r\nHost: test\r\n\r\n")
        .await
        .unwrap();

    // Wait for the handler to claim its slot, then hang up on it.
    let waited = Instant::now();
    while !entered.load(Ordering::SeqCst) {
        assert!(waited.elapsed() < Duration::from_secs(2), "handler never started");
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    drop(stream);

    tokio::time::sleep(Duration::from_millis(200)).await;
    assert!(
        !completed.load(Ordering::SeqCst),
        "handler still mid-flight; the timing margin is broken"
    );
    tokio::time::sleep(Duration::from_millis(500)).await;
    assert!(
        completed.load(Ordering::SeqCst),
        "client disconnect must not preempt a running handler"
    );
    assert_eq!(core.pool.in_flight(), 0, "slot released on natural completion");

    core.shutdown.trigger();
}

#[tokio::test]
async fn graceful_shutdown_waits_for_the_busy_slot() {
    let handler: Arc<dyn Handler> = Arc::new(handler_fn(|_req| async {
        tokio::time::sleep(Duration::from_millis(800)).await;
        Ok(Response::new(Bytes::from_static(b"finished")))
    }));
    // One busy slot, seven free.
    let core = common::spawn_core(1, 8, None, handler).await;
    let client = common::client();

    let url = core.url("/");
    let started = Instant::now();
    let in_flight = tokio::spawn(async move { client.get(&url).send().await });

    // Let the request reach its slot, then signal.
    tokio::time::sleep(Duration::from_millis(150)).await;
    core.shutdown.trigger();
    tokio::time::sleep(Duration::from_millis(150)).await;

    // Accepting stopped immediately.
    let refused = tokio::net::TcpStream::connect(core.addr).await;
    assert!(refused.is_err(), "listener must be closed during drain");

    // The in-flight request still completes.
    let res = in_flight.await.unwrap().expect("in-flight request dropped");
    assert_eq!(res.status(), 200);
    assert_eq!(res.text().await.unwrap(), "finished");

    // And the server exits only after it did.
    core.server.await.unwrap().unwrap();
    assert!(
        started.elapsed() >= Duration::from_millis(750),
        "exit happened before the busy slot completed"
    );
}

#[tokio::test]
async fn default_echo_handler_serves_health_probe() {
    let core = common::spawn_core(1, 8, None, Arc::new(EchoHandler::new())).await;
    let client = common::client();

    let res = client.get(core.url("/health")).send().await.unwrap();
    assert_eq!(res.status(), 200);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["status"], "healthy");

    let res = client
        .post(core.url("/echo"))
        .body("payload")
        .send()
        .await
        .unwrap();
    let text = res.text().await.unwrap();
    assert!(text.starts_with("POST /echo"));
    assert!(text.contains("payload"));

    core.shutdown.trigger();
    core.server.await.unwrap().unwrap();
}

#[tokio::test]
async fn keep_alive_requests_are_served_in_order() {
    let handler: Arc<dyn Handler> = Arc::new(handler_fn(|req| async move {
        Ok(Response::new(Bytes::from(req.uri().path().to_string())))
    }));
    let core = common::spawn_core(1, 8, None, handler).await;

    // Pooled client: sequential requests reuse one connection.
    let client = reqwest::Client::builder().no_proxy().build().unwrap();
    for i in 0..5 {
        let path = format!("/req-{i}");
        let res = client.get(core.url(&path)).send().await.unwrap();
        assert_eq!(res.text().await.unwrap(), path);
    }

    core.shutdown.trigger();
}
