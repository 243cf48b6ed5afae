//! Worker boundary seen by the broker, and the runtime spawn seam.

use std::future::Future;

use crate::core::task::TaskEnvelope;

/// An execution endpoint that runs task code and reports results
/// asynchronously.
///
/// The broker only ever performs a non-blocking handoff
/// ([`schedule_for_execution`](Self::schedule_for_execution)) and a
/// non-blocking poll ([`pull_result`](Self::pull_result)); the backing
/// execution model (thread pool, process pool, RPC stub) is the
/// implementation's business.
pub trait Worker: Send + Sync {
    /// Stable identifier for logging and selection diagnostics.
    fn id(&self) -> &str;

    /// Enqueue a started task into this worker's execution backend.
    /// Must not block; the broker does not wait for completion.
    fn schedule_for_execution(&self, task: TaskEnvelope);

    /// Return the next completed task with its `execution_result` populated,
    /// or `None` when nothing is ready. Must not block, so the broker can
    /// cheaply fan out across many workers.
    fn pull_result(&self) -> Option<TaskEnvelope>;
}

/// Abstraction for spawning task execution on a runtime.
pub trait Spawn {
    /// Spawn an async task that returns a future.
    fn spawn<F>(&self, fut: F)
    where
        F: Future<Output = ()> + Send + 'static;
}
