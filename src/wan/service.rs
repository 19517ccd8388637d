use crate::config::WanConsumerConfig;
use crate::partition::{ManagedService, PartitionId};

use dashmap::DashMap;
use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;

/// Name of the WAN replication service.
pub const SERVICE_NAME: &str = "wan-replication";

/// Consumer configurations, keyed by WAN replication name within each partition.
pub struct WanReplicationService {
    consumers: DashMap<PartitionId, HashMap<String, WanConsumerConfig>>,
}

impl WanReplicationService {
    /// Creates a new service with no consumers configured.
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            consumers: DashMap::new(),
        })
    }

    /// Stores `config`, replacing the consumer configured for `wan_replication_name`.
    ///
    /// # Arguments
    /// * `partition_id` - The partition owning `wan_replication_name`.
    /// * `wan_replication_name` - The WAN replication scheme the consumer belongs to.
    /// * `config` - The consumer configuration to store.
    ///
    /// # Returns
    /// The configuration it replaced, if any.
    pub fn add_consumer_config(
        &self,
        partition_id: PartitionId,
        wan_replication_name: &str,
        config: WanConsumerConfig,
    ) -> Option<WanConsumerConfig> {
        let previous = self
            .consumers
            .entry(partition_id)
            .or_default()
            .insert(wan_replication_name.to_string(), config);

        if previous.is_some() {
            tracing::info!(
                "Replaced WAN consumer config for '{}' on partition {}",
                wan_replication_name,
                partition_id
            );
        } else {
            tracing::debug!(
                "Added WAN consumer config for '{}' on partition {}",
                wan_replication_name,
                partition_id
            );
        }
        previous
    }

    /// Consumer configured for `wan_replication_name` on `partition_id`, if any.
    pub fn get_consumer_config(
        &self,
        partition_id: PartitionId,
        wan_replication_name: &str,
    ) -> Option<WanConsumerConfig> {
        self.consumers
            .get(&partition_id)
            .and_then(|configs| configs.get(wan_replication_name).cloned())
    }

    /// Consumers stored across all partitions.
    pub fn consumer_count(&self) -> usize {
        self.consumers.iter().map(|entry| entry.value().len()).sum()
    }
}

impl ManagedService for WanReplicationService {
    fn name(&self) -> &'static str {
        SERVICE_NAME
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
