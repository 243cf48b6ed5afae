//! Configuration models for brokers and worker fleets.

pub mod broker;

pub use broker::{BrokerConfig, EngineConfig, WorkerFleetConfig};
