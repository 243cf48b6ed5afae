//! Worker selection strategies.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::core::worker::Worker;

/// Policy component choosing which live worker receives a dispatched task.
///
/// Concrete policies (round-robin, least-loaded, ...) are interchangeable
/// strategy values behind this trait; the broker only requires that
/// [`select`](Self::select) yields exactly one worker whenever any exist.
pub trait WorkerSelector: Send + Sync {
    /// Choose the worker for the next dispatch, or `None` when the registry
    /// is empty.
    fn select(&self) -> Option<Arc<dyn Worker>>;

    /// All registered workers, for result draining.
    fn all(&self) -> Vec<Arc<dyn Worker>>;
}

/// Round-robin selection over a fixed worker registry.
pub struct RoundRobinSelector {
    workers: Vec<Arc<dyn Worker>>,
    cursor: AtomicUsize,
}

impl RoundRobinSelector {
    /// Build a selector over a fixed set of workers.
    #[must_use]
    pub fn new(workers: Vec<Arc<dyn Worker>>) -> Self {
        Self {
            workers,
            cursor: AtomicUsize::new(0),
        }
    }
}

impl WorkerSelector for RoundRobinSelector {
    fn select(&self) -> Option<Arc<dyn Worker>> {
        if self.workers.is_empty() {
            return None;
        }
        let slot = self.cursor.fetch_add(1, Ordering::Relaxed) % self.workers.len();
        Some(Arc::clone(&self.workers[slot]))
    }

    fn all(&self) -> Vec<Arc<dyn Worker>> {
        self.workers.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::task::TaskEnvelope;

    struct NamedWorker(String);

    impl Worker for NamedWorker {
        fn id(&self) -> &str {
            &self.0
        }

        fn schedule_for_execution(&self, _task: TaskEnvelope) {}

        fn pull_result(&self) -> Option<TaskEnvelope> {
            None
        }
    }

    fn fleet(n: usize) -> Vec<Arc<dyn Worker>> {
        (0..n)
            .map(|i| Arc::new(NamedWorker(format!("w{i}"))) as Arc<dyn Worker>)
            .collect()
    }

    #[test]
    fn round_robin_cycles_through_workers() {
        let selector = RoundRobinSelector::new(fleet(3));
        let picks: Vec<String> = (0..6)
            .map(|_| selector.select().unwrap().id().to_string())
            .collect();
        assert_eq!(picks, ["w0", "w1", "w2", "w0", "w1", "w2"]);
    }

    #[test]
    fn empty_registry_selects_none() {
        let selector = RoundRobinSelector::new(Vec::new());
        assert!(selector.select().is_none());
        assert!(selector.all().is_empty());
    }

    #[test]
    fn all_returns_every_worker() {
        let selector = RoundRobinSelector::new(fleet(4));
        assert_eq!(selector.all().len(), 4);
    }
}
