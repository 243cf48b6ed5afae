//! In-memory connector: the reference ledger + buffer backend.

use std::collections::{HashMap, VecDeque};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::Notify;
use tokio::time::Instant;
use tracing::debug;

use crate::core::codec::TaskCodec;
use crate::core::connector::TaskConnector;
use crate::core::error::ConnectorError;
use crate::core::task::{TaskEnvelope, TaskId, TaskStatus};

/// Default bounded wait applied by `pull` before returning `None`.
pub const DEFAULT_PULL_WAIT: Duration = Duration::from_millis(100);

/// Per-(namespace, queue) storage: the authoritative ledger plus the FIFO
/// dispatch index.
#[derive(Default)]
struct Scope {
    /// id -> encoded envelope; insert-once, update-thereafter.
    ledger: HashMap<TaskId, String>,
    /// ids awaiting first dispatch, in insertion order.
    buffer: VecDeque<TaskId>,
}

/// In-memory [`TaskConnector`] backend.
///
/// All state lives behind one `parking_lot::Mutex` over the scope map, a
/// superset of the mandated per-scope critical section: the ledger insert and
/// buffer push of `queue` are one atomic unit, so duplicate detection holds
/// under concurrent producers. Critical sections are short and never held
/// across an `.await`.
///
/// No durability is provided across process restarts; backends with real
/// storage implement the same trait without changing the broker contract.
pub struct InMemoryConnector<C: TaskCodec> {
    codec: C,
    scopes: Mutex<HashMap<(String, String), Scope>>,
    /// Signaled on every queue so bounded-wait pulls wake promptly.
    ready: Notify,
    pull_wait: Duration,
}

impl<C: TaskCodec> InMemoryConnector<C> {
    /// Create an empty connector using the given codec.
    pub fn new(codec: C) -> Self {
        Self {
            codec,
            scopes: Mutex::new(HashMap::new()),
            ready: Notify::new(),
            pull_wait: DEFAULT_PULL_WAIT,
        }
    }

    /// Override the bounded wait used by `pull`.
    #[must_use]
    pub fn with_pull_wait(mut self, pull_wait: Duration) -> Self {
        self.pull_wait = pull_wait;
        self
    }

    /// Synchronous variant of [`TaskConnector::queue`] with identical
    /// observable semantics (duplicate detection, atomicity). The async trait
    /// method delegates here; which one producers call is a concurrency-model
    /// choice, not a behavioral one.
    ///
    /// # Errors
    ///
    /// [`ConnectorError::TaskAlreadyQueued`] on a duplicate id, raised before
    /// any mutation; [`ConnectorError::Encoding`] on codec failure.
    pub fn queue_sync(&self, envelope: TaskEnvelope) -> Result<(), ConnectorError> {
        debug_assert_eq!(envelope.status, TaskStatus::Queued);
        let encoded = self.codec.encode(&envelope)?;
        let key = (envelope.namespace.clone(), envelope.task_queue_name.clone());
        {
            let mut scopes = self.scopes.lock();
            let scope = scopes.entry(key).or_default();
            if scope.ledger.contains_key(&envelope.id) {
                return Err(ConnectorError::TaskAlreadyQueued {
                    namespace: envelope.namespace,
                    task_queue_name: envelope.task_queue_name,
                    task_name: envelope.task_name,
                    id: envelope.id,
                });
            }
            scope.ledger.insert(envelope.id, encoded);
            scope.buffer.push_back(envelope.id);
        }
        debug!(
            "task {} queued into {}/{}",
            envelope.id, envelope.namespace, envelope.task_queue_name
        );
        self.ready.notify_waiters();
        Ok(())
    }

    /// Current buffer depth for a scope. Zero for unknown scopes.
    pub fn buffer_len(&self, namespace: &str, task_queue_name: &str) -> usize {
        self.scopes
            .lock()
            .get(&(namespace.to_owned(), task_queue_name.to_owned()))
            .map_or(0, |scope| scope.buffer.len())
    }

    /// Pop the buffer head and decode its ledger entry, without waiting.
    fn try_pull(
        &self,
        namespace: &str,
        task_queue_name: &str,
    ) -> Result<Option<TaskEnvelope>, ConnectorError> {
        let encoded = {
            let mut scopes = self.scopes.lock();
            let Some(scope) = scopes.get_mut(&(namespace.to_owned(), task_queue_name.to_owned()))
            else {
                return Ok(None);
            };
            let Some(id) = scope.buffer.pop_front() else {
                return Ok(None);
            };
            scope.ledger.get(&id).cloned()
        };
        encoded.map_or(Ok(None), |raw| self.codec.decode(&raw).map(Some))
    }
}

#[async_trait]
impl<C: TaskCodec> TaskConnector for InMemoryConnector<C> {
    async fn queue(&self, envelope: TaskEnvelope) -> Result<(), ConnectorError> {
        self.queue_sync(envelope)
    }

    async fn find(
        &self,
        namespace: &str,
        task_queue_name: &str,
        id: TaskId,
    ) -> Result<Option<TaskEnvelope>, ConnectorError> {
        let encoded = {
            let scopes = self.scopes.lock();
            scopes
                .get(&(namespace.to_owned(), task_queue_name.to_owned()))
                .and_then(|scope| scope.ledger.get(&id).cloned())
        };
        encoded.map_or(Ok(None), |raw| self.codec.decode(&raw).map(Some))
    }

    async fn pull(
        &self,
        namespace: &str,
        task_queue_name: &str,
    ) -> Result<Option<TaskEnvelope>, ConnectorError> {
        let deadline = Instant::now() + self.pull_wait;
        loop {
            // Arm the wakeup before checking, so a queue between check and
            // wait is not missed.
            let notified = self.ready.notified();
            if let Some(envelope) = self.try_pull(namespace, task_queue_name)? {
                return Ok(Some(envelope));
            }
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return Ok(None);
            }
            let _ = tokio::time::timeout(remaining, notified).await;
        }
    }

    async fn update(&self, envelope: TaskEnvelope) -> Result<(), ConnectorError> {
        let encoded = self.codec.encode(&envelope)?;
        let key = (envelope.namespace.clone(), envelope.task_queue_name.clone());
        let mut scopes = self.scopes.lock();
        scopes.entry(key).or_default().ledger.insert(envelope.id, encoded);
        Ok(())
    }
}
