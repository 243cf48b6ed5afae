//! Tokio runtime spawner implementation.

use std::future::Future;
use std::sync::Arc;

use crate::core::Spawn;

/// Tokio-based spawner that executes worker futures on a tokio runtime.
#[derive(Clone)]
pub struct TokioSpawner {
    handle: tokio::runtime::Handle,
    /// Present only for owned runtimes, so the runtime outlives every clone
    /// of this spawner.
    _owned: Option<Arc<tokio::runtime::Runtime>>,
}

impl TokioSpawner {
    /// Spawn onto an existing runtime via its handle.
    #[must_use]
    pub const fn new(handle: tokio::runtime::Handle) -> Self {
        Self {
            handle,
            _owned: None,
        }
    }

    /// Build a dedicated multi-threaded runtime with the given number of
    /// worker threads and spawn onto it. The runtime is kept alive for as
    /// long as any clone of the spawner exists.
    ///
    /// # Errors
    ///
    /// Propagates runtime construction failures.
    pub fn with_worker_threads(worker_threads: usize) -> Result<Self, std::io::Error> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(worker_threads)
            .enable_all()
            .build()?;
        Ok(Self {
            handle: runtime.handle().clone(),
            _owned: Some(Arc::new(runtime)),
        })
    }
}

impl Spawn for TokioSpawner {
    fn spawn<F>(&self, fut: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.handle.spawn(fut);
    }
}
