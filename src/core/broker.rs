//! Broker: the scheduling loop moving tasks from queued to started to
//! finished/reset.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tracing::{debug, error, info, warn};

use crate::core::connector::TaskConnector;
use crate::core::error::ConnectorError;
use crate::core::selector::WorkerSelector;
use crate::core::task::TaskEnvelope;

/// Default sleep between idle loop iterations.
pub const DEFAULT_IDLE_BACKOFF: Duration = Duration::from_millis(100);

/// Scope binding and tuning knobs for one broker instance.
#[derive(Debug, Clone)]
pub struct BrokerOptions {
    /// Namespace this broker serves.
    pub namespace: String,
    /// Task queue this broker serves.
    pub task_queue_name: String,
    /// Sleep applied when an iteration did no useful work.
    pub idle_backoff: Duration,
}

impl BrokerOptions {
    /// Bind a broker to one (namespace, queue) scope with default tuning.
    #[must_use]
    pub fn new(namespace: impl Into<String>, task_queue_name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            task_queue_name: task_queue_name.into(),
            idle_backoff: DEFAULT_IDLE_BACKOFF,
        }
    }

    /// Override the idle backoff.
    #[must_use]
    pub fn with_idle_backoff(mut self, idle_backoff: Duration) -> Self {
        self.idle_backoff = idle_backoff;
        self
    }
}

/// The scheduler loop for one (namespace, queue) scope.
///
/// Each iteration drains completed results from every worker first, then
/// (unless closed) pulls at most one fresh task and dispatches it. Draining
/// before dispatch is the back-pressure decision: finishing existing work
/// takes priority over starting new work.
///
/// Dependencies are injected at construction; a broker never consults global
/// state. Multiple brokers may share one connector.
pub struct Broker {
    options: BrokerOptions,
    connector: Arc<dyn TaskConnector>,
    selector: Box<dyn WorkerSelector>,
    /// Reset tasks awaiting redispatch. They bypass the connector buffer and
    /// are drained by `next()` ahead of fresh pulls.
    retries: Mutex<VecDeque<TaskEnvelope>>,
    /// Halts new dispatch. Always set before `stopped`.
    closed: AtomicBool,
    /// Exits the loop after one final drain pass.
    stopped: AtomicBool,
}

impl std::fmt::Debug for Broker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Broker")
            .field("options", &self.options)
            .field("closed", &self.closed)
            .field("stopped", &self.stopped)
            .finish_non_exhaustive()
    }
}

impl Broker {
    /// Build a broker from its collaborators.
    #[must_use]
    pub fn new(
        options: BrokerOptions,
        connector: Arc<dyn TaskConnector>,
        selector: Box<dyn WorkerSelector>,
    ) -> Self {
        Self {
            options,
            connector,
            selector,
            retries: Mutex::new(VecDeque::new()),
            closed: AtomicBool::new(false),
            stopped: AtomicBool::new(false),
        }
    }

    /// Halt new dispatch. In-flight tasks keep running and their results are
    /// still reconciled.
    pub fn close(&self) {
        self.closed.store(true, Ordering::Release);
        info!(
            "broker {}/{} closed to new dispatch",
            self.options.namespace, self.options.task_queue_name
        );
    }

    /// Request loop exit. Sets `closed` first, then `stopped`; the loop
    /// performs one final drain pass before returning.
    pub fn stop(&self) {
        self.close();
        self.stopped.store(true, Ordering::Release);
    }

    /// Whether new dispatch is halted.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    /// Whether loop exit has been requested.
    #[must_use]
    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::Acquire)
    }

    /// Run the scheduling loop until [`stop`](Self::stop) is observed.
    ///
    /// A single task's failure is logged and skipped; it can never stop the
    /// loop.
    pub async fn run(&self) {
        info!(
            "broker loop started for {}/{}",
            self.options.namespace, self.options.task_queue_name
        );
        loop {
            // Always reconcile before dispatching anything new.
            let reconciled = self.handle_outstanding_tasks().await;

            let mut dispatched = false;
            if !self.is_closed() {
                match self.next().await {
                    Ok(Some(task)) => {
                        dispatched = true;
                        if let Err(err) = self.schedule_for_execution(task).await {
                            error!("dispatch failed: {err}");
                        }
                    }
                    Ok(None) => {}
                    Err(err) => error!("pull failed: {err}"),
                }
            }

            if self.is_stopped() {
                // Final drain: results for tasks already dispatched are not
                // lost on shutdown; only new dispatch was halted.
                self.handle_outstanding_tasks().await;
                info!(
                    "broker loop stopped for {}/{}",
                    self.options.namespace, self.options.task_queue_name
                );
                break;
            }

            if reconciled == 0 && !dispatched {
                tokio::time::sleep(self.options.idle_backoff).await;
            }
        }
    }

    /// Next task eligible for dispatch: reset tasks held for redispatch
    /// first, then the connector buffer.
    async fn next(&self) -> Result<Option<TaskEnvelope>, ConnectorError> {
        if let Some(task) = self.retries.lock().pop_front() {
            return Ok(Some(task));
        }
        self.connector
            .pull(&self.options.namespace, &self.options.task_queue_name)
            .await
    }

    /// Transition a task to started, persist, and hand it to one worker.
    ///
    /// The ledger records `started` before the worker is invoked, so a crash
    /// between the two leaves the task visible rather than silently lost.
    async fn schedule_for_execution(&self, task: TaskEnvelope) -> Result<(), ConnectorError> {
        let Some(worker) = self.selector.select() else {
            warn!("no live workers; holding task {} for the next pass", task.id);
            self.retries.lock().push_back(task);
            return Ok(());
        };

        let started = task.start();
        if let Err(err) = self.connector.update(started.clone()).await {
            // Ledger still says queued; keep the task in circulation.
            self.retries.lock().push_back(task);
            return Err(err);
        }

        debug!("task {} started on worker {}", started.id, worker.id());
        worker.schedule_for_execution(started);
        Ok(())
    }

    /// Drain every currently-available result from every worker.
    ///
    /// Non-blocking per worker: a worker with nothing ready is skipped, not
    /// waited on. Returns the number of results reconciled.
    async fn handle_outstanding_tasks(&self) -> usize {
        let mut reconciled = 0;
        for worker in self.selector.all() {
            while let Some(task) = worker.pull_result() {
                let id = task.id;
                match self.result(task).await {
                    Ok(()) => reconciled += 1,
                    Err(err) => {
                        error!("failed to reconcile result for task {id}: {err}");
                    }
                }
            }
        }
        reconciled
    }

    /// Reconcile one reported result: finalize on success, reset and hold
    /// for redispatch otherwise.
    async fn result(&self, task: TaskEnvelope) -> Result<(), ConnectorError> {
        if task.is_execution_finished() {
            let finished = task.finalize();
            self.connector.update(finished).await?;
            info!("task {} finished", task.id);
        } else {
            let requeued = task.reset();
            self.connector.update(requeued.clone()).await?;
            info!("task {} reset for redispatch", requeued.id);
            self.retries.lock().push_back(requeued);
        }
        Ok(())
    }
}
