//! # Quesadilla
//!
//! An embeddable task-queue scheduling engine: an in-memory connector
//! (ledger + FIFO buffer of queued tasks) and a broker loop that pulls
//! tasks, dispatches them to workers, and reconciles results.
//!
//! ## Core Guarantees
//!
//! - **At-most-once dispatch**: a task id is buffered at most once; pulling
//!   removes it permanently, and duplicate submissions are rejected before
//!   any state changes.
//! - **Back-pressure by construction**: every broker iteration drains
//!   completed results from all workers before dispatching anything new, so
//!   in-flight work is bounded by what workers can report back.
//! - **Idempotent state transitions**: every lifecycle change produces a new
//!   envelope value persisted through a single `update` path; re-reads of a
//!   finished task keep returning `finished`.
//! - **Retry without exceptions**: execution failures surface as
//!   non-finished results, which the broker turns into a reset back to
//!   `queued` — a failing task can never kill the broker loop.
//!
//! ## Components
//!
//! - [`core::TaskEnvelope`] — the serializable unit of work.
//! - [`core::TaskConnector`] — queue/find/pull/update seam over the ledger
//!   and buffer; [`infra::InMemoryConnector`] is the reference backend.
//! - [`core::Broker`] — the scheduling loop, bound to one
//!   (namespace, queue) scope.
//! - [`core::WorkerSelector`] / [`core::Worker`] — pluggable dispatch policy
//!   and the execution boundary; [`infra::LocalWorker`] runs tasks
//!   in-process.
//!
//! ## Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use quesadilla::builders::{build_brokers, build_memory_connector};
//! use quesadilla::config::EngineConfig;
//! use quesadilla::core::{TaskConnector, TaskEnvelope, TaskId};
//! use quesadilla::runtime::TokioSpawner;
//!
//! let cfg = EngineConfig::from_json_str(r#"{
//!     "brokers": {"jobs": {"namespace": "default", "task_queue_name": "jobs"}}
//! }"#)?;
//! let connector = build_memory_connector(&cfg);
//! let spawner = TokioSpawner::new(tokio::runtime::Handle::current());
//! let brokers = build_brokers(&cfg, connector.clone(), &my_executor, &spawner)?;
//!
//! connector.queue(TaskEnvelope::new(
//!     TaskId::generate(), "default", "jobs", "send_email",
//!     serde_json::json!({"to": "a@example.com"}),
//! )).await?;
//! ```
//!
//! For complete scenarios, see `tests/broker_test.rs`.

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

/// Core scheduling abstractions: envelopes, connector seam, broker loop.
pub mod core;
/// Configuration models for brokers and worker fleets.
pub mod config;
/// Builders to construct engine components from configuration.
pub mod builders;
/// Infrastructure adapters: connector storage and worker backends.
pub mod infra;
/// Runtime adapters.
pub mod runtime;
/// Shared utilities.
pub mod util;
