//! Worker identity and the RAII slot permit.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use tokio::sync::OwnedSemaphorePermit;

use crate::handler::Handler;

/// Stable identifier of a worker within the pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WorkerId(pub(crate) usize);

impl std::fmt::Display for WorkerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "worker-{}", self.0)
    }
}

/// An isolated execution unit: its own handler instance plus a busy count
/// of occupied thread slots.
pub struct Worker {
    id: WorkerId,
    handler: Arc<dyn Handler>,
    busy: AtomicUsize,
}

impl Worker {
    pub(crate) fn new(id: WorkerId, handler: Arc<dyn Handler>) -> Self {
        Self {
            id,
            handler,
            busy: AtomicUsize::new(0),
        }
    }

    pub fn id(&self) -> WorkerId {
        self.id
    }

    /// Thread slots currently occupied on this worker.
    pub fn busy(&self) -> usize {
        self.busy.load(Ordering::Acquire)
    }

    /// Claim one slot if the busy count is still `expected`.
    pub(crate) fn try_occupy(&self, expected: usize) -> bool {
        self.busy
            .compare_exchange(expected, expected + 1, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    fn release(&self) {
        self.busy.fetch_sub(1, Ordering::AcqRel);
    }
}

/// A claimed thread slot.
///
/// Holds both the pool capacity permit and the worker's busy count; dropping
/// the permit releases the slot on every exit path, including panics above
/// it on the stack.
pub struct SlotPermit {
    worker: Arc<Worker>,
    _permit: OwnedSemaphorePermit,
}

impl SlotPermit {
    pub(crate) fn new(worker: Arc<Worker>, permit: OwnedSemaphorePermit) -> Self {
        Self {
            worker,
            _permit: permit,
        }
    }

    /// Handler instance owned by the worker this slot belongs to.
    pub fn handler(&self) -> Arc<dyn Handler> {
        Arc::clone(&self.worker.handler)
    }

    pub fn worker_id(&self) -> WorkerId {
        self.worker.id()
    }
}

impl Drop for SlotPermit {
    fn drop(&mut self) {
        self.worker.release();
        tracing::trace!(worker = %self.worker.id(), "Slot released");
    }
}
