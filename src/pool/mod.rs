//! Worker and thread-slot pool.
//!
//! # Data Flow
//! ```text
//! dispatch needs a slot
//!     → claim(): wait on the capacity semaphore (FIFO, unbounded queue)
//!     → assign(): pick the least-busy worker with a free thread slot
//!     → SlotPermit (RAII): worker handler + claimed slot
//!     → permit dropped on any exit path → slot free, next waiter runs
//! ```
//!
//! # Design Decisions
//! - One semaphore over total capacity (workers × threads_per_worker)
//!   bounds in-flight work; per-worker busy counters keep each worker at
//!   its per-worker slot limit
//! - Slot claim/release is atomic: compare-and-swap on the busy counter,
//!   semaphore permit tied to the SlotPermit guard
//! - Each worker owns its handler instance, built once at pool creation

use std::sync::Arc;

use tokio::sync::Semaphore;

use crate::handler::Handler;

pub mod worker;

pub use worker::{SlotPermit, Worker, WorkerId};

/// Fixed pool of workers, each multiplexing a fixed number of thread slots.
///
/// The pool bounds process-wide request parallelism: at most
/// `workers × threads_per_worker` requests hold a slot at any instant.
/// Claimants beyond that wait in FIFO order; nothing is ever rejected here.
pub struct WorkerPool {
    workers: Vec<Arc<Worker>>,
    slots: Arc<Semaphore>,
    threads_per_worker: usize,
}

impl WorkerPool {
    /// Build a pool of `workers` workers with `threads_per_worker` slots
    /// each. The factory runs once per worker so every worker owns an
    /// isolated handler instance.
    ///
    /// Counts must be at least 1; config validation enforces this before
    /// the pool is built.
    pub fn new(
        workers: usize,
        threads_per_worker: usize,
        factory: impl Fn() -> Arc<dyn Handler>,
    ) -> Self {
        debug_assert!(workers >= 1 && threads_per_worker >= 1);
        let workers: Vec<Arc<Worker>> = (0..workers)
            .map(|i| Arc::new(Worker::new(WorkerId(i), factory())))
            .collect();
        let capacity = workers.len() * threads_per_worker;

        tracing::info!(
            workers = workers.len(),
            threads_per_worker,
            capacity,
            "Worker pool created"
        );

        Self {
            workers,
            slots: Arc::new(Semaphore::new(capacity)),
            threads_per_worker,
        }
    }

    /// Claim a free thread slot, waiting as long as it takes.
    ///
    /// Waiters are served in arrival order the instant a slot frees.
    pub async fn claim(&self) -> SlotPermit {
        let permit = Arc::clone(&self.slots)
            .acquire_owned()
            .await
            .expect("slot semaphore closed");
        let worker = self.assign();
        SlotPermit::new(worker, permit)
    }

    /// Pick the least-busy worker and atomically claim one of its slots.
    ///
    /// The caller already holds a capacity permit, so by pigeonhole some
    /// worker has a free slot; the CAS loop only retries on races.
    fn assign(&self) -> Arc<Worker> {
        loop {
            let mut best: Option<(&Arc<Worker>, usize)> = None;
            for worker in &self.workers {
                let busy = worker.busy();
                if busy < self.threads_per_worker
                    && best.map_or(true, |(_, b)| busy < b)
                {
                    best = Some((worker, busy));
                }
            }
            if let Some((worker, busy)) = best {
                if worker.try_occupy(busy) {
                    return Arc::clone(worker);
                }
            }
            std::hint::spin_loop();
        }
    }

    /// Total slots across all workers.
    pub fn capacity(&self) -> usize {
        self.workers.len() * self.threads_per_worker
    }

    /// Slots currently claimed.
    pub fn in_flight(&self) -> usize {
        self.capacity() - self.slots.available_permits()
    }

    /// Wait until every slot has been released.
    ///
    /// There is deliberately no deadline: a long-running handler keeps its
    /// slot for as long as it needs.
    pub async fn wait_idle(&self) {
        while self.in_flight() > 0 {
            tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;
        }
    }
}
