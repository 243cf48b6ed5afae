//! Infrastructure adapters for connector storage and worker backends.

pub mod connector;
pub mod worker;

pub use connector::InMemoryConnector;
pub use worker::LocalWorker;
