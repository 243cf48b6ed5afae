//! Task execution boundary.

use async_trait::async_trait;

use crate::core::task::TaskEnvelope;

/// Abstraction over the code a task actually runs.
///
/// The executor resolves `task_name` to business logic and runs it against
/// the envelope payload. Failures are returned as errors here; the worker
/// translates them into a non-finished
/// [`ExecutionResult`](crate::core::task::ExecutionResult) — they are never
/// raised to the broker.
///
/// # Example
///
/// ```rust,ignore
/// use async_trait::async_trait;
/// use quesadilla::core::{TaskEnvelope, TaskExecutor};
///
/// struct EchoExecutor;
///
/// #[async_trait]
/// impl TaskExecutor for EchoExecutor {
///     async fn execute(&self, task: &TaskEnvelope) -> anyhow::Result<serde_json::Value> {
///         Ok(task.payload.clone())
///     }
/// }
/// ```
#[async_trait]
pub trait TaskExecutor: Send + Sync + 'static {
    /// Run the task and return its result value.
    ///
    /// # Errors
    ///
    /// Any failure the executor does not want to treat as terminal success;
    /// the task will be requeued for another attempt.
    async fn execute(&self, task: &TaskEnvelope) -> anyhow::Result<serde_json::Value>;
}
