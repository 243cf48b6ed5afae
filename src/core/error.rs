//! Error types for connector and broker operations.

use thiserror::Error;

use crate::core::task::TaskId;

/// Errors produced by connector backends.
#[derive(Debug, Error)]
pub enum ConnectorError {
    /// A task with this id already exists in the (namespace, queue) scope.
    ///
    /// Raised synchronously, before any mutation. The producer must generate
    /// a new id or treat the submission as already accepted.
    #[error("task `{task_name}` ({id}) already queued in {namespace}/{task_queue_name}")]
    TaskAlreadyQueued {
        /// Namespace of the rejected submission.
        namespace: String,
        /// Queue of the rejected submission.
        task_queue_name: String,
        /// Task name carried by the rejected envelope.
        task_name: String,
        /// The duplicate id.
        id: TaskId,
    },
    /// Backend storage is unreachable or failed with context.
    ///
    /// Not produced by the in-memory backend; kept as a distinct category so
    /// callers can tell "duplicate" from "storage broke".
    #[error("connector unavailable: {0}")]
    Unavailable(String),
    /// Envelope encode/decode failure at the ledger boundary.
    #[error("codec error: {0}")]
    Encoding(#[from] serde_json::Error),
}

/// Application-facing result using anyhow for higher-level contexts.
pub type AppResult<T> = Result<T, anyhow::Error>;
