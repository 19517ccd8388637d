//! Scheduled Executor Module
//!
//! Partition-owned bookkeeping for named tasks submitted to named schedulers, and the
//! client message tasks that reach it.
//!
//! ## Core Concepts
//! - **Handler**: `ScheduledTaskHandler` addresses one task by partition, scheduler and task
//!   name. Clients keep the partition returned at submission and pin it on later requests.
//! - **Service**: `ScheduledExecutorService` stores descriptors per partition; only
//!   operations running on that partition touch them.
//! - **Tasks**: one `MessageTaskDef` per message type in `tasks`.

pub mod operations;
pub mod service;
pub mod tasks;
pub mod types;

pub use service::ScheduledExecutorService;
pub use types::{
    ScheduledTaskDescriptor, ScheduledTaskHandler, ScheduledTaskStatistics, TaskDefinition,
    TaskState, TaskType,
};

use crate::task::TaskRegistry;

/// Registers every scheduled executor message task.
pub fn register_tasks(registry: &TaskRegistry) {
    registry.register::<tasks::SubmitToPartitionTask>();
    registry.register::<tasks::GetStatsFromPartitionTask>();
    registry.register::<tasks::CancelFromPartitionTask>();
    registry.register::<tasks::IsDoneFromPartitionTask>();
    registry.register::<tasks::IsCancelledFromPartitionTask>();
    registry.register::<tasks::GetDelayFromPartitionTask>();
    registry.register::<tasks::DisposeFromPartitionTask>();
}

#[cfg(test)]
mod tests;
