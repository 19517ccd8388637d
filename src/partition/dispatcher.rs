//! Partition Dispatcher
//!
//! Runs operations on per-partition execution contexts.
//!
//! ## Scheduling Model
//! - The dispatcher owns a fixed pool of worker loops, each draining its own FIFO queue.
//! - Partition `p` is always served by worker `p % worker_count`, so operations on one
//!   partition execute one at a time, in submission order, without locks inside the
//!   operation.
//! - Different partitions on different workers run in parallel with no ordering between
//!   them.
//! - A panicking operation is contained by its worker: the caller sees an aborted
//!   `OperationFailure` and the worker moves on to the next job.
//!
//! Submission never waits for execution. Callers hold an `Invocation` and await it; if they
//! stop caring (client gone), the job still runs to completion.

use super::operation::{Invocation, Operation, OperationContext, PartitionOperation};
use super::partitioner::PartitionId;
use super::service::{ManagedService, ServiceRegistry};

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::{mpsc, oneshot};

/// Type-erased work item queued on a partition.
pub type PartitionJob = Box<dyn FnOnce(&OperationContext<'_>) + Send>;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RoutingError {
    #[error("unknown service '{0}'")]
    UnknownService(String),
    #[error("partition {partition} out of range (partition count {partition_count})")]
    PartitionOutOfRange {
        partition: PartitionId,
        partition_count: u32,
    },
    #[error("'{name}' is owned by partition {owner}, not the requested partition {partition}")]
    PartitionMismatch {
        name: String,
        partition: PartitionId,
        owner: PartitionId,
    },
    #[error("partition {0} is not accepting operations")]
    Stopped(PartitionId),
}

/// Accepts work for a partition.
///
/// Implementations must run jobs for the same partition sequentially in submission order,
/// and must not run a job when `submit` returns an error.
pub trait OperationDispatcher: Send + Sync {
    fn partition_count(&self) -> u32;

    fn submit(
        &self,
        service_name: &str,
        partition_id: PartitionId,
        job: PartitionJob,
    ) -> Result<(), RoutingError>;
}

/// Submits a typed operation and returns a handle to its result.
pub fn invoke<P: PartitionOperation>(
    dispatcher: &dyn OperationDispatcher,
    operation: Operation<P>,
) -> Result<Invocation<P::Output>, RoutingError> {
    let (service_name, partition_id, payload) = operation.into_parts();
    let (sender, receiver) = oneshot::channel();

    let job: PartitionJob = Box::new(move |ctx: &OperationContext<'_>| {
        let result = payload.run(ctx);
        if sender.send(result).is_err() {
            tracing::debug!(
                "Caller of {} operation on partition {} is gone, result dropped",
                service_name,
                partition_id
            );
        }
    });

    dispatcher.submit(service_name, partition_id, job)?;
    Ok(Invocation::new(partition_id, receiver))
}

struct QueuedJob {
    partition_id: PartitionId,
    service: Arc<dyn ManagedService>,
    job: PartitionJob,
}

/// In-process dispatcher backed by tokio worker loops.
pub struct PartitionDispatcher {
    services: Arc<ServiceRegistry>,
    workers: Vec<mpsc::UnboundedSender<QueuedJob>>,
    partition_count: u32,
}

impl PartitionDispatcher {
    /// Spawns `worker_count` workers on the current tokio runtime.
    pub fn start(
        services: Arc<ServiceRegistry>,
        partition_count: u32,
        worker_count: usize,
    ) -> Arc<Self> {
        let worker_count = worker_count.max(1);
        tracing::info!(
            "Starting {} partition workers for {} partitions",
            worker_count,
            partition_count
        );

        let workers = (0..worker_count)
            .map(|worker_id| {
                let (tx, rx) = mpsc::unbounded_channel();
                tokio::spawn(Self::worker_loop(worker_id, rx));
                tx
            })
            .collect();

        Arc::new(Self {
            services,
            workers,
            partition_count,
        })
    }

    pub fn worker_count(&self) -> usize {
        self.workers.len()
    }

    pub fn worker_for(&self, partition_id: PartitionId) -> usize {
        partition_id as usize % self.workers.len()
    }

    async fn worker_loop(worker_id: usize, mut rx: mpsc::UnboundedReceiver<QueuedJob>) {
        tracing::debug!("Partition worker {} started", worker_id);

        while let Some(queued) = rx.recv().await {
            let QueuedJob {
                partition_id,
                service,
                job,
            } = queued;
            let ctx = OperationContext::new(partition_id, service.as_ref());

            if catch_unwind(AssertUnwindSafe(move || job(&ctx))).is_err() {
                tracing::error!(
                    "Operation on partition {} (service {}) panicked",
                    partition_id,
                    service.name()
                );
            }
        }

        tracing::debug!("Partition worker {} stopped", worker_id);
    }
}

impl OperationDispatcher for PartitionDispatcher {
    fn partition_count(&self) -> u32 {
        self.partition_count
    }

    fn submit(
        &self,
        service_name: &str,
        partition_id: PartitionId,
        job: PartitionJob,
    ) -> Result<(), RoutingError> {
        if partition_id >= self.partition_count {
            return Err(RoutingError::PartitionOutOfRange {
                partition: partition_id,
                partition_count: self.partition_count,
            });
        }

        let service = self
            .services
            .get(service_name)
            .ok_or_else(|| RoutingError::UnknownService(service_name.to_string()))?;

        let worker = self.worker_for(partition_id);
        self.workers[worker]
            .send(QueuedJob {
                partition_id,
                service,
                job,
            })
            .map_err(|_| RoutingError::Stopped(partition_id))
    }
}
