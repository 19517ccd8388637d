//! Message Task Module
//!
//! The request pipeline shared by every partition-routed client message.
//!
//! ## Core Concepts
//! - **Definition**: `MessageTaskDef` is what a message type contributes (decoding, permission,
//!   target name, operation factory, response encoding).
//! - **Task**: `PartitionTask<T>` runs the pipeline for a definition; `MessageTask` is its
//!   type-erased form.
//! - **Registry**: `TaskRegistry` picks the task for an incoming frame.

pub mod context;
pub mod partition_task;
pub mod registry;

pub use context::TaskContext;
pub use partition_task::{MessageTask, MessageTaskDef, OutputOf, PartitionTask};
pub use registry::TaskRegistry;
