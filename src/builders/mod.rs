//! Builders to construct engine components from configuration.

pub mod broker_builder;

pub use broker_builder::{build_broker, build_brokers, build_local_fleet, build_memory_connector};
