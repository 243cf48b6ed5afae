//! Connector seam: authoritative task store plus FIFO dispatch index.

use async_trait::async_trait;

use crate::core::error::ConnectorError;
use crate::core::task::{TaskEnvelope, TaskId};

/// Façade unifying the ledger (authoritative envelope store) and the buffer
/// (FIFO index of ids awaiting first dispatch), scoped by
/// `(namespace, task_queue_name)`.
///
/// All mutation of ledger/buffer state goes through these four operations;
/// no other component touches the storage directly. Implementations must
/// serialize the ledger-insert + buffer-push of [`queue`](Self::queue) as a
/// single atomic unit per scope so duplicate detection holds under concurrent
/// producers.
#[async_trait]
pub trait TaskConnector: Send + Sync {
    /// Insert a fully-formed queued envelope and index it for dispatch.
    ///
    /// # Errors
    ///
    /// [`ConnectorError::TaskAlreadyQueued`] when the id already exists in
    /// the scope (checked before any mutation), or a backend/codec error.
    async fn queue(&self, envelope: TaskEnvelope) -> Result<(), ConnectorError>;

    /// Look up the latest ledger entry for an id. Never touches the buffer,
    /// never blocks.
    ///
    /// # Errors
    ///
    /// Backend or codec failures only; a missing id is `Ok(None)`.
    async fn find(
        &self,
        namespace: &str,
        task_queue_name: &str,
        id: TaskId,
    ) -> Result<Option<TaskEnvelope>, ConnectorError>;

    /// Pop the buffer head and return its ledger entry, waiting a short
    /// bounded interval for an item before returning `Ok(None)`.
    ///
    /// Pulling removes the id from the buffer permanently.
    ///
    /// # Errors
    ///
    /// Backend or codec failures only; an empty buffer is `Ok(None)`.
    async fn pull(
        &self,
        namespace: &str,
        task_queue_name: &str,
    ) -> Result<Option<TaskEnvelope>, ConnectorError>;

    /// Overwrite the ledger entry for `envelope.id`. The buffer is untouched;
    /// this is the sole mechanism for status transitions after queuing.
    ///
    /// # Errors
    ///
    /// Backend or codec failures.
    async fn update(&self, envelope: TaskEnvelope) -> Result<(), ConnectorError>;
}
