//! WAN Replication Module
//!
//! Stores WAN consumer configurations on the partition owning each WAN replication name,
//! and serves them to clients at the client's negotiated record version.

pub mod operations;
pub mod service;
pub mod tasks;

pub use service::WanReplicationService;

use crate::config::WanConsumerEntry;
use crate::partition::{Operation, invoke};
use crate::task::{TaskContext, TaskRegistry};
use operations::AddWanConsumerConfigOperation;

use anyhow::{Context, Result};

/// Registers both WAN consumer configuration message tasks.
pub fn register_tasks(registry: &TaskRegistry) {
    registry.register::<tasks::AddWanConsumerConfigTask>();
    registry.register::<tasks::GetWanConsumerConfigTask>();
}

/// Installs bootstrap consumer configurations through the partition dispatcher, the same
/// path client additions take.
pub async fn install_consumers(ctx: &TaskContext, entries: Vec<WanConsumerEntry>) -> Result<usize> {
    let count = entries.len();

    for entry in entries {
        let partition_id = ctx.partitioner.get_partition(&entry.wan_replication_name);
        let name = entry.wan_replication_name.clone();
        let operation = Operation::new(
            service::SERVICE_NAME,
            partition_id,
            AddWanConsumerConfigOperation {
                wan_replication_name: entry.wan_replication_name,
                config: entry.consumer,
            },
        );

        invoke(&*ctx.dispatcher, operation)
            .with_context(|| format!("routing WAN consumer config '{name}'"))?
            .join()
            .await
            .with_context(|| format!("installing WAN consumer config '{name}'"))?;
    }

    tracing::info!("Installed {} WAN consumer configs", count);
    Ok(count)
}
