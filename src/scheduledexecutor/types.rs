use crate::partition::PartitionId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Name of the scheduled executor service.
pub const SERVICE_NAME: &str = "scheduled-executor";

/// The addressed task does not exist (never submitted, or disposed).
pub const STALE_TASK_HANDLER: i32 = 110;
/// A task with the same name already exists in the scheduler.
pub const DUPLICATE_TASK: i32 = 111;
pub const ILLEGAL_ARGUMENT: i32 = 112;

/// Address of one scheduled task: partition, scheduler and task name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScheduledTaskHandler {
    pub partition_id: PartitionId,
    pub scheduler_name: String,
    pub task_name: String,
}

impl ScheduledTaskHandler {
    pub fn of(
        partition_id: PartitionId,
        scheduler_name: impl Into<String>,
        task_name: impl Into<String>,
    ) -> Self {
        Self {
            partition_id,
            scheduler_name: scheduler_name.into(),
            task_name: task_name.into(),
        }
    }
}

impl fmt::Display for ScheduledTaskHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "urn:scheduledTaskHandler:{}/{}/{}",
            self.partition_id, self.scheduler_name, self.task_name
        )
    }
}

/// How a task repeats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaskType {
    /// Runs once after the initial delay.
    OneShot,
    /// Runs after the initial delay, then every period.
    FixedRate,
}

impl TaskType {
    pub fn from_wire(value: u8) -> Option<Self> {
        match value {
            0 => Some(TaskType::OneShot),
            1 => Some(TaskType::FixedRate),
            _ => None,
        }
    }

    pub fn to_wire(self) -> u8 {
        match self {
            TaskType::OneShot => 0,
            TaskType::FixedRate => 1,
        }
    }
}

/// What a client submitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskDefinition {
    pub name: String,
    pub task_type: TaskType,
    pub initial_delay_ms: i64,
    pub period_ms: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaskState {
    Scheduled,
    Done,
    Cancelled,
}

/// Run statistics of a task, fed by the timer engine after each run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduledTaskStatistics {
    pub total_runs: u64,
    pub last_run_duration_ns: u64,
    pub last_idle_time_ns: u64,
    pub total_run_time_ns: u64,
    pub total_idle_time_ns: u64,
}

impl ScheduledTaskStatistics {
    /// Accounts one run that started after `idle_ns` of waiting and took `run_ns`.
    pub fn record_run(&mut self, idle_ns: u64, run_ns: u64) {
        self.total_runs += 1;
        self.last_idle_time_ns = idle_ns;
        self.last_run_duration_ns = run_ns;
        self.total_idle_time_ns = self.total_idle_time_ns.saturating_add(idle_ns);
        self.total_run_time_ns = self.total_run_time_ns.saturating_add(run_ns);
    }
}

/// Partition-owned record of one scheduled task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduledTaskDescriptor {
    pub definition: TaskDefinition,
    pub state: TaskState,
    pub stats: ScheduledTaskStatistics,
    pub submitted_at_ms: u64,
}

impl ScheduledTaskDescriptor {
    pub fn new(definition: TaskDefinition, submitted_at_ms: u64) -> Self {
        Self {
            definition,
            state: TaskState::Scheduled,
            stats: ScheduledTaskStatistics::default(),
            submitted_at_ms,
        }
    }

    pub fn is_done(&self) -> bool {
        self.state != TaskState::Scheduled
    }

    /// Milliseconds until the next run, zero if it is due or will never run again.
    ///
    /// Saturates at `i64::MAX` for schedules too far out to represent.
    pub fn delay_ms(&self, now_ms: u64) -> i64 {
        if self.is_done() {
            return 0;
        }

        let initial = self.definition.initial_delay_ms.max(0) as u64;
        let periods = match self.definition.task_type {
            TaskType::OneShot => 0,
            TaskType::FixedRate => self
                .stats
                .total_runs
                .saturating_mul(self.definition.period_ms.max(0) as u64),
        };
        let next_run_at = self
            .submitted_at_ms
            .saturating_add(initial)
            .saturating_add(periods);
        i64::try_from(next_run_at.saturating_sub(now_ms)).unwrap_or(i64::MAX)
    }
}

/// Current system time in milliseconds.
pub fn now_ms() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}
