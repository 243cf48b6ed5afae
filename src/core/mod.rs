//! Core scheduling abstractions: envelopes, the connector seam, and the
//! broker loop.

pub mod broker;
pub mod codec;
pub mod connector;
pub mod error;
pub mod executor;
pub mod selector;
pub mod task;
pub mod worker;

pub use broker::{Broker, BrokerOptions, DEFAULT_IDLE_BACKOFF};
pub use codec::{JsonCodec, TaskCodec};
pub use connector::TaskConnector;
pub use error::{AppResult, ConnectorError};
pub use executor::TaskExecutor;
pub use selector::{RoundRobinSelector, WorkerSelector};
pub use task::{ExecutionResult, TaskEnvelope, TaskId, TaskStatus};
pub use worker::{Spawn, Worker};
