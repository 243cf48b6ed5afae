//! Connector backends.

pub mod memory;

pub use memory::InMemoryConnector;
