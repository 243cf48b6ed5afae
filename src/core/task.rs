//! Task envelope: the serializable unit of work and its lifecycle.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique, time-ordered task identifier.
///
/// Wraps a UUIDv7 so ids sort by creation time. The core never generates
/// ids itself; producers supply one at queue time ([`TaskId::generate`] is a
/// convenience for them) and the engine treats it as an opaque key.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct TaskId(Uuid);

impl TaskId {
    /// Generate a fresh time-ordered id.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::now_v7())
    }

    /// Wrap an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Lifecycle status of a task as recorded in the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Awaiting first dispatch (the only status with buffer membership).
    Queued,
    /// Dispatched to a worker; execution in flight.
    Started,
    /// Completed successfully. Terminal.
    Finished,
    /// Execution reported non-finished; reset back to queued is pending.
    Failed,
}

/// Result payload reported by a worker after execution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionResult {
    /// True when the task completed and must not be redispatched.
    pub finished: bool,
    /// Result value produced by the executor, if any.
    pub payload: Option<serde_json::Value>,
    /// Error description for non-finished executions.
    pub error: Option<String>,
}

impl ExecutionResult {
    /// Successful completion with an optional result value.
    #[must_use]
    pub const fn finished(payload: Option<serde_json::Value>) -> Self {
        Self {
            finished: true,
            payload,
            error: None,
        }
    }

    /// Incomplete or failed execution; the broker will requeue the task.
    #[must_use]
    pub const fn not_finished(error: Option<String>) -> Self {
        Self {
            finished: false,
            payload: None,
            error,
        }
    }
}

/// The serializable unit of work.
///
/// Envelopes are immutable by convention: every lifecycle transition
/// ([`start`](Self::start), [`finalize`](Self::finalize),
/// [`reset`](Self::reset), [`with_result`](Self::with_result)) produces a new
/// envelope value. The ledger entry for an id is the single source of truth;
/// the buffer references an id only while its status is [`TaskStatus::Queued`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskEnvelope {
    /// Globally unique, time-ordered identifier, assigned by the producer.
    pub id: TaskId,
    /// Logical tenant/grouping.
    pub namespace: String,
    /// Logical queue within the namespace.
    pub task_queue_name: String,
    /// Reference to the code to run; opaque to the engine, resolved by the
    /// executor collaborator.
    pub task_name: String,
    /// Opaque arguments handed to the executor.
    pub payload: serde_json::Value,
    /// Current lifecycle status.
    pub status: TaskStatus,
    /// Populated only after a worker completes an execution attempt.
    pub execution_result: Option<ExecutionResult>,
}

impl TaskEnvelope {
    /// Build a fresh envelope in [`TaskStatus::Queued`], ready for
    /// `TaskConnector::queue`.
    #[must_use]
    pub fn new(
        id: TaskId,
        namespace: impl Into<String>,
        task_queue_name: impl Into<String>,
        task_name: impl Into<String>,
        payload: serde_json::Value,
    ) -> Self {
        Self {
            id,
            namespace: namespace.into(),
            task_queue_name: task_queue_name.into(),
            task_name: task_name.into(),
            payload,
            status: TaskStatus::Queued,
            execution_result: None,
        }
    }

    /// Transition to [`TaskStatus::Started`]. Performed by the broker right
    /// before handing the task to a worker.
    #[must_use]
    pub fn start(&self) -> Self {
        Self {
            status: TaskStatus::Started,
            ..self.clone()
        }
    }

    /// Transition to [`TaskStatus::Finished`]. Terminal.
    #[must_use]
    pub fn finalize(&self) -> Self {
        Self {
            status: TaskStatus::Finished,
            ..self.clone()
        }
    }

    /// Transition back to [`TaskStatus::Queued`] after a non-finished
    /// execution, clearing the stale result so the next attempt starts clean.
    #[must_use]
    pub fn reset(&self) -> Self {
        Self {
            status: TaskStatus::Queued,
            execution_result: None,
            ..self.clone()
        }
    }

    /// Attach an execution result. Performed by workers when reporting back;
    /// status is left untouched, reconciliation is the broker's job.
    #[must_use]
    pub fn with_result(&self, result: ExecutionResult) -> Self {
        Self {
            execution_result: Some(result),
            ..self.clone()
        }
    }

    /// Whether the attached execution result, if any, reports completion.
    #[must_use]
    pub fn is_execution_finished(&self) -> bool {
        self.execution_result
            .as_ref()
            .is_some_and(|result| result.finished)
    }
}
