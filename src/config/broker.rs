//! Broker and worker fleet configuration structures.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

const fn default_backoff_ms() -> u64 {
    100
}

fn default_worker_count() -> usize {
    num_cpus::get()
}

/// Configuration for one broker instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrokerConfig {
    /// Namespace the broker serves.
    pub namespace: String,
    /// Task queue within the namespace.
    pub task_queue_name: String,
    /// Sleep between idle loop iterations, milliseconds.
    #[serde(default = "default_backoff_ms")]
    pub idle_backoff_ms: u64,
}

impl BrokerConfig {
    /// Validate broker configuration values.
    ///
    /// # Errors
    ///
    /// A human-readable description of the first invalid field.
    pub fn validate(&self) -> Result<(), String> {
        if self.namespace.is_empty() {
            return Err("namespace must not be empty".into());
        }
        if self.task_queue_name.is_empty() {
            return Err("task_queue_name must not be empty".into());
        }
        if self.idle_backoff_ms == 0 {
            return Err("idle_backoff_ms must be greater than 0".into());
        }
        Ok(())
    }
}

/// Sizing for a local worker fleet.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerFleetConfig {
    /// Number of local workers to build.
    #[serde(default = "default_worker_count")]
    pub worker_count: usize,
}

impl Default for WorkerFleetConfig {
    fn default() -> Self {
        Self {
            worker_count: default_worker_count(),
        }
    }
}

impl WorkerFleetConfig {
    /// Validate fleet configuration values.
    ///
    /// # Errors
    ///
    /// A human-readable description of the first invalid field.
    pub fn validate(&self) -> Result<(), String> {
        if self.worker_count == 0 {
            return Err("worker_count must be greater than 0".into());
        }
        Ok(())
    }
}

/// Root engine configuration: named brokers plus one worker fleet.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Map of broker name to configuration.
    pub brokers: HashMap<String, BrokerConfig>,
    /// Local worker fleet sizing, applied per broker.
    #[serde(default)]
    pub workers: WorkerFleetConfig,
    /// Bounded wait applied by connector pulls, milliseconds.
    #[serde(default = "default_backoff_ms")]
    pub pull_wait_ms: u64,
}

impl EngineConfig {
    /// Validate all brokers and the fleet; requires at least one broker.
    ///
    /// # Errors
    ///
    /// A human-readable description of the first invalid entry.
    pub fn validate(&self) -> Result<(), String> {
        if self.brokers.is_empty() {
            return Err("at least one broker must be defined".into());
        }
        for (name, broker) in &self.brokers {
            broker
                .validate()
                .map_err(|e| format!("broker `{name}` invalid: {e}"))?;
        }
        self.workers.validate()
    }

    /// Parse engine configuration from a JSON string and validate.
    ///
    /// # Errors
    ///
    /// Parse failures or validation failures, as a human-readable string.
    pub fn from_json_str(input: &str) -> Result<Self, String> {
        let cfg: Self = serde_json::from_str(input).map_err(|e| format!("parse error: {e}"))?;
        cfg.validate()?;
        Ok(cfg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_fill_in_backoffs_and_fleet() {
        let cfg = EngineConfig::from_json_str(
            r#"{"brokers": {"jobs": {"namespace": "default", "task_queue_name": "jobs"}}}"#,
        )
        .unwrap();
        let broker = &cfg.brokers["jobs"];
        assert_eq!(broker.idle_backoff_ms, 100);
        assert_eq!(cfg.pull_wait_ms, 100);
        assert!(cfg.workers.worker_count >= 1);
    }

    #[test]
    fn empty_namespace_is_rejected() {
        let err = EngineConfig::from_json_str(
            r#"{"brokers": {"jobs": {"namespace": "", "task_queue_name": "jobs"}}}"#,
        )
        .unwrap_err();
        assert!(err.contains("namespace"));
    }

    #[test]
    fn no_brokers_is_rejected() {
        let err = EngineConfig::from_json_str(r#"{"brokers": {}}"#).unwrap_err();
        assert!(err.contains("at least one broker"));
    }

    #[test]
    fn zero_workers_is_rejected() {
        let err = EngineConfig::from_json_str(
            r#"{
                "brokers": {"jobs": {"namespace": "default", "task_queue_name": "jobs"}},
                "workers": {"worker_count": 0}
            }"#,
        )
        .unwrap_err();
        assert!(err.contains("worker_count"));
    }

    #[test]
    fn parse_error_is_reported() {
        let err = EngineConfig::from_json_str("{").unwrap_err();
        assert!(err.contains("parse error"));
    }
}
