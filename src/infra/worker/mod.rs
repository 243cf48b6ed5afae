//! Worker execution backends.

pub mod local;

pub use local::{LocalWorker, LocalWorkerStats};
