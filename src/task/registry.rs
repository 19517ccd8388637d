//! Message Task Registry
//!
//! Maps wire message types to the task that handles them. The registry is the entry point
//! for raw client frames: it reads the header, picks the task and returns the response
//! frame, so transports only move bytes.

use super::context::TaskContext;
use super::partition_task::{MessageTask, MessageTaskDef, PartitionTask};
use crate::protocol::message::UNKNOWN_CORRELATION_ID;
use crate::protocol::{ClientMessage, ClientResponse, TaskError};
use crate::versioning::Version;

use bytes::Bytes;
use dashmap::DashMap;
use std::sync::Arc;

/// Registry holding one task per message type.
pub struct TaskRegistry {
    tasks: DashMap<u16, Arc<dyn MessageTask>>,
}

impl TaskRegistry {
    /// Creates a new, empty registry.
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Registers the partition-routed task for `T`.
    pub fn register<T: MessageTaskDef>(&self) {
        self.register_task(Arc::new(PartitionTask::<T>::new()));
    }

    /// Registers an already-built task under its message type.
    ///
    /// # Arguments
    /// * `task` - The task; a second task for the same message type replaces the first
    ///   and logs a warning.
    pub fn register_task(&self, task: Arc<dyn MessageTask>) {
        let message_type = task.message_type();
        let operation_name = task.operation_name();

        if self.tasks.insert(message_type, task).is_some() {
            tracing::warn!(
                "Message type {:#06x} re-registered ({})",
                message_type,
                operation_name
            );
        }

        tracing::info!(
            "Registered message task: {:#06x} -> {}",
            message_type,
            operation_name
        );
    }

    /// Looks up the task for `message_type`.
    pub fn get(&self, message_type: u16) -> Option<Arc<dyn MessageTask>> {
        self.tasks.get(&message_type).map(|entry| entry.value().clone())
    }

    pub fn has_task(&self, message_type: u16) -> bool {
        self.tasks.contains_key(&message_type)
    }

    /// `(message type, operation name)` pairs, sorted by message type.
    pub fn list_tasks(&self) -> Vec<(u16, &'static str)> {
        let mut tasks: Vec<_> = self
            .tasks
            .iter()
            .map(|entry| (*entry.key(), entry.value().operation_name()))
            .collect();
        tasks.sort_unstable();
        tasks
    }

    pub fn task_count(&self) -> usize {
        self.tasks.len()
    }

    /// Handles one already-split request.
    pub async fn handle(
        &self,
        message: ClientMessage,
        version: Version,
        ctx: &TaskContext,
    ) -> ClientResponse {
        let Some(task) = self.get(message.message_type) else {
            tracing::debug!(
                "No task for message type {:#06x} (correlation {})",
                message.message_type,
                message.correlation_id
            );
            return TaskError::UnknownMessageType(message.message_type)
                .into_response(message.correlation_id);
        };

        task.process(message, version, ctx).await
    }

    /// Handles one raw request frame and returns the response frame.
    pub async fn handle_frame(&self, frame: Bytes, version: Version, ctx: &TaskContext) -> Bytes {
        let response = match ClientMessage::decode(frame) {
            Ok(message) => self.handle(message, version, ctx).await,
            Err(err) => {
                tracing::debug!("Unreadable request header: {}", err);
                TaskError::from(err).into_response(UNKNOWN_CORRELATION_ID)
            }
        };
        response.encode()
    }
}

impl Default for TaskRegistry {
    fn default() -> Self {
        Self {
            tasks: DashMap::new(),
        }
    }
}
