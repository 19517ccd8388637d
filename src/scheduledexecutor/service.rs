use super::types::*;
use crate::partition::{ManagedService, OperationFailure, PartitionId};

use dashmap::DashMap;
use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;

/// Tasks of one partition, grouped by scheduler name.
#[derive(Debug, Default)]
pub struct SchedulerContainer {
    schedulers: HashMap<String, HashMap<String, ScheduledTaskDescriptor>>,
}

impl SchedulerContainer {
    /// Tasks held across all schedulers of the partition.
    pub fn task_count(&self) -> usize {
        self.schedulers.values().map(HashMap::len).sum()
    }
}

/// Holds scheduled-task bookkeeping for every partition of this node.
///
/// Running the tasks is the timer engine's business; this service only stores what was
/// submitted and the statistics the engine reports back.
pub struct ScheduledExecutorService {
    containers: DashMap<PartitionId, SchedulerContainer>,
}

impl ScheduledExecutorService {
    /// Creates a new service with no partitions populated.
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            containers: DashMap::new(),
        })
    }

    /// Stores a new task on a partition and returns the handler that addresses it.
    ///
    /// # Arguments
    /// * `partition_id` - The partition the submitting operation runs on.
    /// * `scheduler_name` - The scheduler that groups the task.
    /// * `definition` - The task itself; its name must be unique within the scheduler.
    /// * `now_ms` - Submission time, the origin for delay calculations.
    ///
    /// # Returns
    /// * `Ok(handler)` for a stored task.
    /// * `Err` with `ILLEGAL_ARGUMENT` for an invalid definition, or `DUPLICATE_TASK` if the
    ///   name is already taken in that scheduler.
    pub fn submit(
        &self,
        partition_id: PartitionId,
        scheduler_name: &str,
        definition: TaskDefinition,
        now_ms: u64,
    ) -> Result<ScheduledTaskHandler, OperationFailure> {
        validate(&definition)?;

        let mut container = self.containers.entry(partition_id).or_default();
        let tasks = container
            .schedulers
            .entry(scheduler_name.to_string())
            .or_default();

        if tasks.contains_key(&definition.name) {
            return Err(OperationFailure::new(
                DUPLICATE_TASK,
                format!(
                    "task '{}' already exists in scheduler '{}'",
                    definition.name, scheduler_name
                ),
            ));
        }

        let handler = ScheduledTaskHandler::of(partition_id, scheduler_name, &definition.name);
        tasks.insert(
            definition.name.clone(),
            ScheduledTaskDescriptor::new(definition, now_ms),
        );

        tracing::debug!("Scheduled {}", handler);
        Ok(handler)
    }

    /// Runs `f` against the task addressed by `handler`.
    ///
    /// Fails with `STALE_TASK_HANDLER` if the task does not exist on that partition.
    pub fn with_task<R>(
        &self,
        handler: &ScheduledTaskHandler,
        f: impl FnOnce(&mut ScheduledTaskDescriptor) -> R,
    ) -> Result<R, OperationFailure> {
        let mut container = self
            .containers
            .get_mut(&handler.partition_id)
            .ok_or_else(|| stale(handler))?;

        let descriptor = container
            .schedulers
            .get_mut(&handler.scheduler_name)
            .and_then(|tasks| tasks.get_mut(&handler.task_name))
            .ok_or_else(|| stale(handler))?;

        Ok(f(descriptor))
    }

    /// Removes the task; later lookups of `handler` are stale.
    pub fn dispose(&self, handler: &ScheduledTaskHandler) -> Result<(), OperationFailure> {
        let mut container = self
            .containers
            .get_mut(&handler.partition_id)
            .ok_or_else(|| stale(handler))?;

        let tasks = container
            .schedulers
            .get_mut(&handler.scheduler_name)
            .ok_or_else(|| stale(handler))?;

        tasks.remove(&handler.task_name).ok_or_else(|| stale(handler))?;
        if tasks.is_empty() {
            container.schedulers.remove(&handler.scheduler_name);
        }

        tracing::debug!("Disposed {}", handler);
        Ok(())
    }

    /// Tasks stored on `partition_id`, zero for a partition never touched.
    pub fn task_count(&self, partition_id: PartitionId) -> usize {
        self.containers
            .get(&partition_id)
            .map(|container| container.task_count())
            .unwrap_or(0)
    }
}

impl ManagedService for ScheduledExecutorService {
    fn name(&self) -> &'static str {
        SERVICE_NAME
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

fn validate(definition: &TaskDefinition) -> Result<(), OperationFailure> {
    if definition.name.is_empty() {
        return Err(OperationFailure::new(ILLEGAL_ARGUMENT, "task name is empty"));
    }
    if definition.initial_delay_ms < 0 {
        return Err(OperationFailure::new(
            ILLEGAL_ARGUMENT,
            format!("negative initial delay {}", definition.initial_delay_ms),
        ));
    }
    if definition.period_ms < 0 {
        return Err(OperationFailure::new(
            ILLEGAL_ARGUMENT,
            format!("negative period {}", definition.period_ms),
        ));
    }
    if definition.task_type == TaskType::FixedRate && definition.period_ms == 0 {
        return Err(OperationFailure::new(
            ILLEGAL_ARGUMENT,
            format!("fixed-rate task needs a positive period, got {}", definition.period_ms),
        ));
    }
    Ok(())
}

fn stale(handler: &ScheduledTaskHandler) -> OperationFailure {
    OperationFailure::new(STALE_TASK_HANDLER, format!("{} not found", handler))
}
