//! Builders constructing brokers and worker fleets from configuration.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use crate::config::{BrokerConfig, EngineConfig, WorkerFleetConfig};
use crate::core::{
    Broker, BrokerOptions, JsonCodec, RoundRobinSelector, Spawn, TaskConnector, TaskExecutor,
    Worker,
};
use crate::infra::connector::InMemoryConnector;
use crate::infra::worker::LocalWorker;

/// Build the in-memory connector configured for an engine.
pub fn build_memory_connector(cfg: &EngineConfig) -> Arc<InMemoryConnector<JsonCodec>> {
    Arc::new(
        InMemoryConnector::new(JsonCodec)
            .with_pull_wait(Duration::from_millis(cfg.pull_wait_ms)),
    )
}

/// Build a round-robin fleet of local workers sharing one executor.
///
/// Worker ids are `{prefix}-w{index}`.
pub fn build_local_fleet<S>(
    prefix: &str,
    cfg: &WorkerFleetConfig,
    executor: &Arc<dyn TaskExecutor>,
    spawner: &S,
) -> RoundRobinSelector
where
    S: Spawn + Clone + Send + Sync + 'static,
{
    let workers: Vec<Arc<dyn Worker>> = (0..cfg.worker_count)
        .map(|index| {
            Arc::new(LocalWorker::new(
                format!("{prefix}-w{index}"),
                Arc::clone(executor),
                spawner.clone(),
            )) as Arc<dyn Worker>
        })
        .collect();
    RoundRobinSelector::new(workers)
}

/// Build one broker with its own local worker fleet.
pub fn build_broker<S>(
    name: &str,
    cfg: &BrokerConfig,
    fleet: &WorkerFleetConfig,
    connector: Arc<dyn TaskConnector>,
    executor: &Arc<dyn TaskExecutor>,
    spawner: &S,
) -> Broker
where
    S: Spawn + Clone + Send + Sync + 'static,
{
    let options = BrokerOptions::new(&cfg.namespace, &cfg.task_queue_name)
        .with_idle_backoff(Duration::from_millis(cfg.idle_backoff_ms));
    let selector = build_local_fleet(name, fleet, executor, spawner);
    Broker::new(options, connector, Box::new(selector))
}

/// Build every broker named in a validated engine configuration, all sharing
/// one connector. Each broker owns its selector and fleet; selectors are
/// never shared across brokers.
///
/// # Errors
///
/// Configuration validation failures, as human-readable strings.
pub fn build_brokers<S>(
    cfg: &EngineConfig,
    connector: Arc<dyn TaskConnector>,
    executor: &Arc<dyn TaskExecutor>,
    spawner: &S,
) -> Result<HashMap<String, Broker>, String>
where
    S: Spawn + Clone + Send + Sync + 'static,
{
    cfg.validate()?;

    let mut brokers = HashMap::new();
    for (name, broker_cfg) in &cfg.brokers {
        let broker = build_broker(
            name,
            broker_cfg,
            &cfg.workers,
            Arc::clone(&connector),
            executor,
            spawner,
        );
        brokers.insert(name.clone(), broker);
    }
    Ok(brokers)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::TaskEnvelope;
    use crate::runtime::TokioSpawner;
    use async_trait::async_trait;

    struct NoopExecutor;

    #[async_trait]
    impl TaskExecutor for NoopExecutor {
        async fn execute(&self, _task: &TaskEnvelope) -> anyhow::Result<serde_json::Value> {
            Ok(serde_json::Value::Null)
        }
    }

    fn engine_cfg() -> EngineConfig {
        EngineConfig::from_json_str(
            r#"{
                "brokers": {
                    "jobs": {"namespace": "default", "task_queue_name": "jobs"},
                    "reports": {"namespace": "default", "task_queue_name": "reports"}
                },
                "workers": {"worker_count": 2}
            }"#,
        )
        .unwrap()
    }

    #[tokio::test]
    async fn builds_one_broker_per_config_entry() {
        let cfg = engine_cfg();
        let connector = build_memory_connector(&cfg);
        let executor: Arc<dyn TaskExecutor> = Arc::new(NoopExecutor);
        let spawner = TokioSpawner::new(tokio::runtime::Handle::current());

        let brokers = build_brokers(&cfg, connector, &executor, &spawner).unwrap();
        assert_eq!(brokers.len(), 2);
        assert!(brokers.contains_key("jobs"));
        assert!(brokers.contains_key("reports"));
    }

    #[tokio::test]
    async fn invalid_config_is_rejected() {
        let mut cfg = engine_cfg();
        cfg.workers.worker_count = 0;
        let connector = build_memory_connector(&cfg);
        let executor: Arc<dyn TaskExecutor> = Arc::new(NoopExecutor);
        let spawner = TokioSpawner::new(tokio::runtime::Handle::current());

        let err = build_brokers(&cfg, connector, &executor, &spawner).unwrap_err();
        assert!(err.contains("worker_count"));
    }

    #[test]
    fn fleet_ids_carry_the_prefix() {
        let fleet = WorkerFleetConfig { worker_count: 3 };
        let executor: Arc<dyn TaskExecutor> = Arc::new(NoopExecutor);
        let spawner = TokioSpawner::with_worker_threads(1).unwrap();

        let selector = build_local_fleet("jobs", &fleet, &executor, &spawner);
        let ids: Vec<String> = crate::core::WorkerSelector::all(&selector)
            .iter()
            .map(|w| w.id().to_string())
            .collect();
        assert_eq!(ids, ["jobs-w0", "jobs-w1", "jobs-w2"]);
    }
}
