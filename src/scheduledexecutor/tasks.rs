//! Scheduled Executor Message Tasks
//!
//! Client requests addressing a single scheduled task. Clients normally pin the partition
//! that holds the task; when they don't, the scheduler name decides.

use super::operations::*;
use super::types::*;
use crate::partition::PartitionId;
use crate::protocol::TaskError;
use crate::security::{Action, RequiredPermission};
use crate::task::MessageTaskDef;
use crate::versioning::Version;
use crate::wire::{WireReader, WireWriter};

pub const SUBMIT_TO_PARTITION: u16 = 0x1A01;
pub const GET_STATS_FROM_PARTITION: u16 = 0x1A02;
pub const CANCEL_FROM_PARTITION: u16 = 0x1A03;
pub const IS_DONE_FROM_PARTITION: u16 = 0x1A04;
pub const IS_CANCELLED_FROM_PARTITION: u16 = 0x1A05;
pub const GET_DELAY_FROM_PARTITION: u16 = 0x1A06;
pub const DISPOSE_FROM_PARTITION: u16 = 0x1A07;

/// Scheduler and task name, the parameters most requests share.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskRef {
    pub scheduler_name: String,
    pub task_name: String,
}

impl TaskRef {
    pub fn new(scheduler_name: impl Into<String>, task_name: impl Into<String>) -> Self {
        Self {
            scheduler_name: scheduler_name.into(),
            task_name: task_name.into(),
        }
    }

    fn decode(input: &mut WireReader) -> Result<Self, TaskError> {
        Ok(Self {
            scheduler_name: input.read_string()?,
            task_name: input.read_string()?,
        })
    }

    pub fn encode(&self, out: &mut WireWriter) {
        out.write_string(&self.scheduler_name);
        out.write_string(&self.task_name);
    }

    fn handler(&self, partition_id: PartitionId) -> ScheduledTaskHandler {
        ScheduledTaskHandler::of(partition_id, &self.scheduler_name, &self.task_name)
    }
}

// ---------------------------------------------------------------------------
// submit
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitParams {
    pub scheduler_name: String,
    pub definition: TaskDefinition,
}

impl SubmitParams {
    pub fn encode(&self, out: &mut WireWriter) {
        out.write_string(&self.scheduler_name);
        out.write_string(&self.definition.name);
        out.write_u8(self.definition.task_type.to_wire());
        out.write_i64(self.definition.initial_delay_ms);
        out.write_i64(self.definition.period_ms);
    }
}

pub struct SubmitToPartitionTask;

impl MessageTaskDef for SubmitToPartitionTask {
    type Params = SubmitParams;
    type Operation = SubmitOperation;

    const MESSAGE_TYPE: u16 = SUBMIT_TO_PARTITION;
    const SERVICE_NAME: &'static str = SERVICE_NAME;
    const OPERATION_NAME: &'static str = "submitToPartition";
    const PARTITION_PINNED: bool = true;

    fn decode(input: &mut WireReader, _version: Version) -> Result<SubmitParams, TaskError> {
        let scheduler_name = input.read_string()?;
        let name = input.read_string()?;
        let raw_type = input.read_u8()?;
        let task_type = TaskType::from_wire(raw_type)
            .ok_or_else(|| TaskError::MalformedRequest(format!("unknown task type {raw_type}")))?;
        let initial_delay_ms = input.read_i64()?;
        let period_ms = input.read_i64()?;

        Ok(SubmitParams {
            scheduler_name,
            definition: TaskDefinition {
                name,
                task_type,
                initial_delay_ms,
                period_ms,
            },
        })
    }

    fn required_permission(params: &SubmitParams) -> RequiredPermission {
        RequiredPermission::scheduled_executor(Action::Modify, &params.scheduler_name)
    }

    fn distributed_object_name(params: &SubmitParams) -> &str {
        &params.scheduler_name
    }

    fn prepare_operation(params: &SubmitParams, _partition_id: PartitionId) -> SubmitOperation {
        SubmitOperation {
            scheduler_name: params.scheduler_name.clone(),
            definition: params.definition.clone(),
        }
    }

    fn encode_response(_handler: ScheduledTaskHandler, _out: &mut WireWriter, _version: Version) {}
}

// ---------------------------------------------------------------------------
// getStatistics
// ---------------------------------------------------------------------------

pub struct GetStatsFromPartitionTask;

impl MessageTaskDef for GetStatsFromPartitionTask {
    type Params = TaskRef;
    type Operation = GetStatisticsOperation;

    const MESSAGE_TYPE: u16 = GET_STATS_FROM_PARTITION;
    const SERVICE_NAME: &'static str = SERVICE_NAME;
    const OPERATION_NAME: &'static str = "getStatistics";
    const PARTITION_PINNED: bool = true;

    fn decode(input: &mut WireReader, _version: Version) -> Result<TaskRef, TaskError> {
        TaskRef::decode(input)
    }

    fn required_permission(params: &TaskRef) -> RequiredPermission {
        RequiredPermission::scheduled_executor(Action::Read, &params.scheduler_name)
    }

    fn distributed_object_name(params: &TaskRef) -> &str {
        &params.scheduler_name
    }

    fn prepare_operation(params: &TaskRef, partition_id: PartitionId) -> GetStatisticsOperation {
        GetStatisticsOperation {
            handler: params.handler(partition_id),
        }
    }

    fn encode_response(stats: ScheduledTaskStatistics, out: &mut WireWriter, _version: Version) {
        out.write_i64(stats.last_idle_time_ns as i64);
        out.write_i64(stats.total_idle_time_ns as i64);
        out.write_i64(stats.total_runs as i64);
        out.write_i64(stats.total_run_time_ns as i64);
    }
}

// ---------------------------------------------------------------------------
// cancel
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CancelParams {
    pub task: TaskRef,
    pub may_interrupt: bool,
}

pub struct CancelFromPartitionTask;

impl MessageTaskDef for CancelFromPartitionTask {
    type Params = CancelParams;
    type Operation = CancelOperation;

    const MESSAGE_TYPE: u16 = CANCEL_FROM_PARTITION;
    const SERVICE_NAME: &'static str = SERVICE_NAME;
    const OPERATION_NAME: &'static str = "cancel";
    const PARTITION_PINNED: bool = true;

    fn decode(input: &mut WireReader, _version: Version) -> Result<CancelParams, TaskError> {
        Ok(CancelParams {
            task: TaskRef::decode(input)?,
            may_interrupt: input.read_bool()?,
        })
    }

    fn required_permission(params: &CancelParams) -> RequiredPermission {
        RequiredPermission::scheduled_executor(Action::Modify, &params.task.scheduler_name)
    }

    fn distributed_object_name(params: &CancelParams) -> &str {
        &params.task.scheduler_name
    }

    fn prepare_operation(params: &CancelParams, partition_id: PartitionId) -> CancelOperation {
        CancelOperation {
            handler: params.task.handler(partition_id),
            may_interrupt: params.may_interrupt,
        }
    }

    fn encode_response(cancelled: bool, out: &mut WireWriter, _version: Version) {
        out.write_bool(cancelled);
    }
}

// ---------------------------------------------------------------------------
// isDone / isCancelled
// ---------------------------------------------------------------------------

pub struct IsDoneFromPartitionTask;

impl MessageTaskDef for IsDoneFromPartitionTask {
    type Params = TaskRef;
    type Operation = IsDoneOperation;

    const MESSAGE_TYPE: u16 = IS_DONE_FROM_PARTITION;
    const SERVICE_NAME: &'static str = SERVICE_NAME;
    const OPERATION_NAME: &'static str = "isDone";
    const PARTITION_PINNED: bool = true;

    fn decode(input: &mut WireReader, _version: Version) -> Result<TaskRef, TaskError> {
        TaskRef::decode(input)
    }

    fn required_permission(params: &TaskRef) -> RequiredPermission {
        RequiredPermission::scheduled_executor(Action::Read, &params.scheduler_name)
    }

    fn distributed_object_name(params: &TaskRef) -> &str {
        &params.scheduler_name
    }

    fn prepare_operation(params: &TaskRef, partition_id: PartitionId) -> IsDoneOperation {
        IsDoneOperation {
            handler: params.handler(partition_id),
        }
    }

    fn encode_response(done: bool, out: &mut WireWriter, _version: Version) {
        out.write_bool(done);
    }
}

pub struct IsCancelledFromPartitionTask;

impl MessageTaskDef for IsCancelledFromPartitionTask {
    type Params = TaskRef;
    type Operation = IsCancelledOperation;

    const MESSAGE_TYPE: u16 = IS_CANCELLED_FROM_PARTITION;
    const SERVICE_NAME: &'static str = SERVICE_NAME;
    const OPERATION_NAME: &'static str = "isCancelled";
    const PARTITION_PINNED: bool = true;

    fn decode(input: &mut WireReader, _version: Version) -> Result<TaskRef, TaskError> {
        TaskRef::decode(input)
    }

    fn required_permission(params: &TaskRef) -> RequiredPermission {
        RequiredPermission::scheduled_executor(Action::Read, &params.scheduler_name)
    }

    fn distributed_object_name(params: &TaskRef) -> &str {
        &params.scheduler_name
    }

    fn prepare_operation(params: &TaskRef, partition_id: PartitionId) -> IsCancelledOperation {
        IsCancelledOperation {
            handler: params.handler(partition_id),
        }
    }

    fn encode_response(cancelled: bool, out: &mut WireWriter, _version: Version) {
        out.write_bool(cancelled);
    }
}

// ---------------------------------------------------------------------------
// getDelay
// ---------------------------------------------------------------------------

pub struct GetDelayFromPartitionTask;

impl MessageTaskDef for GetDelayFromPartitionTask {
    type Params = TaskRef;
    type Operation = GetDelayOperation;

    const MESSAGE_TYPE: u16 = GET_DELAY_FROM_PARTITION;
    const SERVICE_NAME: &'static str = SERVICE_NAME;
    const OPERATION_NAME: &'static str = "getDelay";
    const PARTITION_PINNED: bool = true;

    fn decode(input: &mut WireReader, _version: Version) -> Result<TaskRef, TaskError> {
        TaskRef::decode(input)
    }

    fn required_permission(params: &TaskRef) -> RequiredPermission {
        RequiredPermission::scheduled_executor(Action::Read, &params.scheduler_name)
    }

    fn distributed_object_name(params: &TaskRef) -> &str {
        &params.scheduler_name
    }

    fn prepare_operation(params: &TaskRef, partition_id: PartitionId) -> GetDelayOperation {
        GetDelayOperation {
            handler: params.handler(partition_id),
        }
    }

    fn encode_response(delay_ms: i64, out: &mut WireWriter, _version: Version) {
        out.write_i64(delay_ms);
    }
}

// ---------------------------------------------------------------------------
// dispose
// ---------------------------------------------------------------------------

pub struct DisposeFromPartitionTask;

impl MessageTaskDef for DisposeFromPartitionTask {
    type Params = TaskRef;
    type Operation = DisposeOperation;

    const MESSAGE_TYPE: u16 = DISPOSE_FROM_PARTITION;
    const SERVICE_NAME: &'static str = SERVICE_NAME;
    const OPERATION_NAME: &'static str = "dispose";
    const PARTITION_PINNED: bool = true;

    fn decode(input: &mut WireReader, _version: Version) -> Result<TaskRef, TaskError> {
        TaskRef::decode(input)
    }

    fn required_permission(params: &TaskRef) -> RequiredPermission {
        RequiredPermission::scheduled_executor(Action::Destroy, &params.scheduler_name)
    }

    fn distributed_object_name(params: &TaskRef) -> &str {
        &params.scheduler_name
    }

    fn prepare_operation(params: &TaskRef, partition_id: PartitionId) -> DisposeOperation {
        DisposeOperation {
            handler: params.handler(partition_id),
        }
    }

    fn encode_response(_output: (), _out: &mut WireWriter, _version: Version) {}
}
