use crate::config::NodeConfig;
use crate::partition::{PartitionDispatcher, PartitionManager, ServiceRegistry};
use crate::scheduledexecutor::{self, ScheduledExecutorService};
use crate::security::PermissionEvaluator;
use crate::task::{TaskContext, TaskRegistry};
use crate::versioning::Version;
use crate::wan::{self, WanReplicationService};

use std::sync::Arc;
use uuid::Uuid;

/// Everything one data node serves clients with.
pub struct Node {
    pub node_id: Uuid,
    /// Version assumed for clients that do not announce one.
    pub cluster_version: Version,
    pub registry: Arc<TaskRegistry>,
    pub ctx: TaskContext,
    pub scheduled_executor: Arc<ScheduledExecutorService>,
    pub wan: Arc<WanReplicationService>,
}

impl Node {
    /// Registers the services, starts the partition workers and registers every message
    /// task. Must be called from within a tokio runtime.
    pub fn start(config: &NodeConfig, security: Arc<dyn PermissionEvaluator>) -> Arc<Self> {
        let node_id = Uuid::new_v4();
        tracing::info!("Node ID: {}", node_id);

        let scheduled_executor = ScheduledExecutorService::new();
        let wan = WanReplicationService::new();

        let services = ServiceRegistry::new();
        services.register(scheduled_executor.clone());
        services.register(wan.clone());

        let dispatcher = PartitionDispatcher::start(
            services,
            config.partition_count,
            config.partition_threads,
        );
        let ctx = TaskContext::new(
            Arc::new(PartitionManager::new(config.partition_count)),
            dispatcher,
            security,
        );

        let registry = TaskRegistry::new();
        scheduledexecutor::register_tasks(&registry);
        wan::register_tasks(&registry);

        Arc::new(Self {
            node_id,
            cluster_version: config.cluster_version,
            registry,
            ctx,
            scheduled_executor,
            wan,
        })
    }
}
