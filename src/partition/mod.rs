//! Partition Module
//!
//! Routing and execution of partition-bound operations.
//!
//! ## Core Concepts
//! - **Partitioning**: `PartitionManager` maps a distributed object name to one of a fixed
//!   number of partitions.
//! - **Services**: `ServiceRegistry` holds the services that own per-partition state.
//! - **Operations**: `Operation<P>` binds a typed payload to a service and a partition.
//! - **Dispatch**: `OperationDispatcher` is the execution contract; `PartitionDispatcher`
//!   runs each partition on a single-threaded worker so partition state needs no locking
//!   discipline of its own.

pub mod dispatcher;
pub mod operation;
pub mod partitioner;
pub mod service;

pub use dispatcher::{OperationDispatcher, PartitionDispatcher, PartitionJob, RoutingError, invoke};
pub use operation::{
    Invocation, Operation, OperationContext, OperationFailure, PartitionOperation,
};
pub use partitioner::{PartitionId, PartitionManager};
pub use service::{ManagedService, ServiceRegistry};
