//! In-process worker backed by a spawned executor future per task.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crossbeam_channel::{unbounded, Receiver, Sender};
use tracing::{debug, warn};

use crate::core::executor::TaskExecutor;
use crate::core::task::{ExecutionResult, TaskEnvelope};
use crate::core::worker::{Spawn, Worker};

/// Snapshot of a local worker's execution counters.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalWorkerStats {
    /// Executions that returned a finished result.
    pub completed: u64,
    /// Executions translated into a non-finished result.
    pub failed: u64,
}

/// Reference execution backend running tasks in-process.
///
/// `schedule_for_execution` spawns one executor future per task on the
/// injected runtime; completed envelopes flow back through an unbounded
/// channel that `pull_result` drains without blocking. Executor errors are
/// translated into non-finished results here, never surfaced to the broker.
pub struct LocalWorker<S: Spawn> {
    id: String,
    executor: Arc<dyn TaskExecutor>,
    spawner: S,
    results_tx: Sender<TaskEnvelope>,
    results_rx: Receiver<TaskEnvelope>,
    completed: Arc<AtomicU64>,
    failed: Arc<AtomicU64>,
}

impl<S: Spawn> LocalWorker<S> {
    /// Build a worker around an executor and a runtime spawner.
    pub fn new(id: impl Into<String>, executor: Arc<dyn TaskExecutor>, spawner: S) -> Self {
        let (results_tx, results_rx) = unbounded();
        Self {
            id: id.into(),
            executor,
            spawner,
            results_tx,
            results_rx,
            completed: Arc::new(AtomicU64::new(0)),
            failed: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Counter snapshot.
    pub fn stats(&self) -> LocalWorkerStats {
        LocalWorkerStats {
            completed: self.completed.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
        }
    }
}

impl<S: Spawn + Send + Sync> Worker for LocalWorker<S> {
    fn id(&self) -> &str {
        &self.id
    }

    fn schedule_for_execution(&self, task: TaskEnvelope) {
        let executor = Arc::clone(&self.executor);
        let results_tx = self.results_tx.clone();
        let completed = Arc::clone(&self.completed);
        let failed = Arc::clone(&self.failed);
        let worker_id = self.id.clone();

        self.spawner.spawn(async move {
            debug!("worker {worker_id} executing task {}", task.id);
            let result = match executor.execute(&task).await {
                Ok(value) => {
                    completed.fetch_add(1, Ordering::Relaxed);
                    ExecutionResult::finished(Some(value))
                }
                Err(err) => {
                    failed.fetch_add(1, Ordering::Relaxed);
                    warn!("task {} failed on worker {worker_id}: {err:#}", task.id);
                    ExecutionResult::not_finished(Some(format!("{err:#}")))
                }
            };
            // Send only fails when the worker was dropped; results for a
            // dead worker have nowhere to go anyway.
            let _ = results_tx.send(task.with_result(result));
        });
    }

    fn pull_result(&self) -> Option<TaskEnvelope> {
        self.results_rx.try_recv().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::task::TaskId;
    use crate::runtime::TokioSpawner;
    use async_trait::async_trait;
    use std::time::Duration;

    struct EchoExecutor;

    #[async_trait]
    impl TaskExecutor for EchoExecutor {
        async fn execute(&self, task: &TaskEnvelope) -> anyhow::Result<serde_json::Value> {
            Ok(task.payload.clone())
        }
    }

    struct FailingExecutor;

    #[async_trait]
    impl TaskExecutor for FailingExecutor {
        async fn execute(&self, _task: &TaskEnvelope) -> anyhow::Result<serde_json::Value> {
            anyhow::bail!("boom")
        }
    }

    fn task() -> TaskEnvelope {
        TaskEnvelope::new(
            TaskId::generate(),
            "default",
            "jobs",
            "echo",
            serde_json::json!({"x": 1}),
        )
        .start()
    }

    async fn await_result<S: Spawn + Send + Sync>(worker: &LocalWorker<S>) -> TaskEnvelope {
        for _ in 0..100 {
            if let Some(env) = worker.pull_result() {
                return env;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("no result within timeout");
    }

    #[tokio::test]
    async fn successful_execution_reports_finished_result() {
        let worker = LocalWorker::new(
            "w0",
            Arc::new(EchoExecutor),
            TokioSpawner::new(tokio::runtime::Handle::current()),
        );
        let env = task();
        worker.schedule_for_execution(env.clone());

        let reported = await_result(&worker).await;
        assert_eq!(reported.id, env.id);
        assert!(reported.is_execution_finished());
        assert_eq!(
            reported.execution_result.unwrap().payload,
            Some(serde_json::json!({"x": 1}))
        );
        assert_eq!(worker.stats().completed, 1);
    }

    #[tokio::test]
    async fn executor_error_becomes_non_finished_result() {
        let worker = LocalWorker::new(
            "w0",
            Arc::new(FailingExecutor),
            TokioSpawner::new(tokio::runtime::Handle::current()),
        );
        worker.schedule_for_execution(task());

        let reported = await_result(&worker).await;
        assert!(!reported.is_execution_finished());
        let result = reported.execution_result.unwrap();
        assert!(result.error.unwrap().contains("boom"));
        assert_eq!(worker.stats().failed, 1);
    }

    #[tokio::test]
    async fn pull_result_is_non_blocking_when_nothing_is_ready() {
        let worker = LocalWorker::new(
            "w0",
            Arc::new(EchoExecutor),
            TokioSpawner::new(tokio::runtime::Handle::current()),
        );
        assert!(worker.pull_result().is_none());
    }
}
