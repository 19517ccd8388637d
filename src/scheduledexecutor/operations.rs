//! Scheduled Executor Operations
//!
//! Each operation runs on the partition that owns its scheduler's tasks, so none of them
//! needs to coordinate with the others.

use super::service::ScheduledExecutorService;
use super::types::*;
use crate::partition::{OperationContext, OperationFailure, PartitionOperation};

#[derive(Debug)]
pub struct SubmitOperation {
    pub scheduler_name: String,
    pub definition: TaskDefinition,
}

impl PartitionOperation for SubmitOperation {
    type Output = ScheduledTaskHandler;

    fn run(self, ctx: &OperationContext<'_>) -> Result<Self::Output, OperationFailure> {
        let service = ctx.service::<ScheduledExecutorService>()?;
        service.submit(
            ctx.partition_id(),
            &self.scheduler_name,
            self.definition,
            now_ms(),
        )
    }
}

#[derive(Debug)]
pub struct GetStatisticsOperation {
    pub handler: ScheduledTaskHandler,
}

impl PartitionOperation for GetStatisticsOperation {
    type Output = ScheduledTaskStatistics;

    fn run(self, ctx: &OperationContext<'_>) -> Result<Self::Output, OperationFailure> {
        let service = ctx.service::<ScheduledExecutorService>()?;
        service.with_task(&self.handler, |task| task.stats.clone())
    }
}

#[derive(Debug)]
pub struct CancelOperation {
    pub handler: ScheduledTaskHandler,
    pub may_interrupt: bool,
}

impl PartitionOperation for CancelOperation {
    type Output = bool;

    /// `false` when the task had already completed or been cancelled.
    fn run(self, ctx: &OperationContext<'_>) -> Result<bool, OperationFailure> {
        let service = ctx.service::<ScheduledExecutorService>()?;
        service.with_task(&self.handler, |task| {
            if task.is_done() {
                return false;
            }
            task.state = TaskState::Cancelled;
            tracing::debug!(
                "Cancelled {} (may_interrupt={})",
                self.handler,
                self.may_interrupt
            );
            true
        })
    }
}

#[derive(Debug)]
pub struct IsDoneOperation {
    pub handler: ScheduledTaskHandler,
}

impl PartitionOperation for IsDoneOperation {
    type Output = bool;

    fn run(self, ctx: &OperationContext<'_>) -> Result<bool, OperationFailure> {
        let service = ctx.service::<ScheduledExecutorService>()?;
        service.with_task(&self.handler, |task| task.is_done())
    }
}

#[derive(Debug)]
pub struct IsCancelledOperation {
    pub handler: ScheduledTaskHandler,
}

impl PartitionOperation for IsCancelledOperation {
    type Output = bool;

    fn run(self, ctx: &OperationContext<'_>) -> Result<bool, OperationFailure> {
        let service = ctx.service::<ScheduledExecutorService>()?;
        service.with_task(&self.handler, |task| task.state == TaskState::Cancelled)
    }
}

#[derive(Debug)]
pub struct GetDelayOperation {
    pub handler: ScheduledTaskHandler,
}

impl PartitionOperation for GetDelayOperation {
    type Output = i64;

    fn run(self, ctx: &OperationContext<'_>) -> Result<i64, OperationFailure> {
        let service = ctx.service::<ScheduledExecutorService>()?;
        let now = now_ms();
        service.with_task(&self.handler, |task| task.delay_ms(now))
    }
}

#[derive(Debug)]
pub struct DisposeOperation {
    pub handler: ScheduledTaskHandler,
}

impl PartitionOperation for DisposeOperation {
    type Output = ();

    fn run(self, ctx: &OperationContext<'_>) -> Result<(), OperationFailure> {
        let service = ctx.service::<ScheduledExecutorService>()?;
        service.dispose(&self.handler)
    }
}

/// Reported by the timer engine after it ran a task.
///
/// A one-shot task is done after its first run.
#[derive(Debug)]
pub struct RecordRunOperation {
    pub handler: ScheduledTaskHandler,
    pub idle_ns: u64,
    pub run_ns: u64,
}

impl PartitionOperation for RecordRunOperation {
    type Output = ();

    fn run(self, ctx: &OperationContext<'_>) -> Result<(), OperationFailure> {
        let service = ctx.service::<ScheduledExecutorService>()?;
        service.with_task(&self.handler, |task| {
            if task.state == TaskState::Cancelled {
                return;
            }
            task.stats.record_run(self.idle_ns, self.run_ns);
            if task.definition.task_type == TaskType::OneShot {
                task.state = TaskState::Done;
            }
        })
    }
}
