//! Slot-pool concurrency behavior, observed through the full HTTP stack.

use std::sync::Arc;
use std::time::{Duration, Instant};

use hyper::body::Bytes;

use gantry::handler::{handler_fn, Handler, Response};

mod common;

use common::OccupancyGauge;

/// Handler that records occupancy and sleeps for `millis`.
fn sleeping_handler(gauge: Arc<OccupancyGauge>, millis: u64) -> Arc<dyn Handler> {
    Arc::new(handler_fn(move |_req| {
        let gauge = Arc::clone(&gauge);
        async move {
            gauge.enter();
            tokio::time::sleep(Duration::from_millis(millis)).await;
            gauge.exit();
            Ok(Response::new(Bytes::from_static(b"done")))
        }
    }))
}

#[tokio::test]
async fn requests_up_to_capacity_fill_distinct_slots() {
    let gauge = Arc::new(OccupancyGauge::default());
    let core = common::spawn_core(1, 8, None, sleeping_handler(Arc::clone(&gauge), 400)).await;
    let client = common::client();

    let started = Instant::now();
    let mut requests = Vec::new();
    for _ in 0..8 {
        let client = client.clone();
        let url = core.url("/");
        requests.push(tokio::spawn(async move { client.get(&url).send().await }));
    }
    for request in requests {
        let res = request.await.unwrap().expect("core unreachable");
        assert_eq!(res.status(), 200);
    }

    assert_eq!(gauge.peak(), 8, "all eight must run concurrently");
    assert!(
        started.elapsed() < Duration::from_millis(750),
        "no request should have queued, took {:?}",
        started.elapsed()
    );
    assert_eq!(core.pool.in_flight(), 0, "every slot back in the pool");

    core.shutdown.trigger();
}

#[tokio::test]
async fn request_beyond_capacity_waits_for_a_free_slot() {
    let gauge = Arc::new(OccupancyGauge::default());
    let core = common::spawn_core(1, 8, None, sleeping_handler(Arc::clone(&gauge), 400)).await;
    let client = common::client();

    let mut requests = Vec::new();
    for _ in 0..9 {
        let client = client.clone();
        let url = core.url("/");
        requests.push(tokio::spawn(async move {
            let started = Instant::now();
            let res = client.get(&url).send().await;
            (started.elapsed(), res)
        }));
    }

    let mut elapsed = Vec::new();
    for request in requests {
        let (took, res) = request.await.unwrap();
        assert_eq!(res.expect("core unreachable").status(), 200);
        elapsed.push(took);
    }
    elapsed.sort();

    assert_eq!(gauge.peak(), 8, "the ninth request must not add concurrency");
    assert!(
        elapsed[7] < Duration::from_millis(700),
        "eight requests dispatch immediately, eighth took {:?}",
        elapsed[7]
    );
    assert!(
        elapsed[8] >= Duration::from_millis(700),
        "the ninth waits a full slot turn, took {:?}",
        elapsed[8]
    );

    core.shutdown.trigger();
}

#[tokio::test]
async fn long_running_handler_is_never_terminated() {
    let gauge = Arc::new(OccupancyGauge::default());
    let core = common::spawn_core(1, 1, None, sleeping_handler(Arc::clone(&gauge), 2000)).await;
    let client = common::client();

    let started = Instant::now();
    let res = client.get(core.url("/")).send().await.unwrap();
    assert_eq!(res.status(), 200);
    assert_eq!(res.text().await.unwrap(), "done");
    assert!(
        started.elapsed() >= Duration::from_millis(1950),
        "handler must run its full natural duration"
    );
    assert_eq!(gauge.current(), 0, "slot released on natural completion");

    core.shutdown.trigger();
}

#[tokio::test]
async fn finite_timeout_returns_504_and_frees_the_slot() {
    let handler: Arc<dyn Handler> = Arc::new(handler_fn(|req| async move {
        if req.uri().path() == "/slow" {
            tokio::time::sleep(Duration::from_secs(30)).await;
        }
        Ok(Response::new(Bytes::from_static(b"fast")))
    }));
    let core = common::spawn_core(1, 1, Some(1), handler).await;
    let client = common::client();

    let started = Instant::now();
    let res = client.get(core.url("/slow")).send().await.unwrap();
    assert_eq!(res.status(), 504);
    assert!(started.elapsed() < Duration::from_secs(3));

    // The expired slot is back in the pool.
    let res = client.get(core.url("/fast")).send().await.unwrap();
    assert_eq!(res.status(), 200);
    assert_eq!(res.text().await.unwrap(), "fast");

    core.shutdown.trigger();
}
