use super::partitioner::PartitionId;
use super::service::ManagedService;

use std::fmt;
use thiserror::Error;
use tokio::sync::oneshot;

/// The operation panicked or its worker went away before producing a result.
pub const OPERATION_ABORTED: i32 = 100;
/// The service resolved for the operation is not the type the operation expects.
pub const SERVICE_MISMATCH: i32 = 101;

/// Domain failure raised while an operation runs on its partition.
///
/// The code is chosen by the domain and passed through to the client untouched.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{message} (code {code})")]
pub struct OperationFailure {
    pub code: i32,
    pub message: String,
}

impl OperationFailure {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn aborted(message: impl Into<String>) -> Self {
        Self::new(OPERATION_ABORTED, message)
    }
}

/// A unit of work bound to one partition.
///
/// `run` executes on the partition's worker, strictly after every operation submitted to
/// the same partition before it.
pub trait PartitionOperation: Send + fmt::Debug + 'static {
    type Output: Send + 'static;

    fn run(self, ctx: &OperationContext<'_>) -> Result<Self::Output, OperationFailure>;
}

/// An operation payload together with its routing.
///
/// The partition id is fixed at construction; there is no way to move an operation to
/// another partition afterwards.
#[derive(Debug)]
pub struct Operation<P> {
    service_name: &'static str,
    partition_id: PartitionId,
    payload: P,
}

impl<P: PartitionOperation> Operation<P> {
    pub fn new(service_name: &'static str, partition_id: PartitionId, payload: P) -> Self {
        Self {
            service_name,
            partition_id,
            payload,
        }
    }

    pub fn service_name(&self) -> &'static str {
        self.service_name
    }

    pub fn partition_id(&self) -> PartitionId {
        self.partition_id
    }

    pub fn payload(&self) -> &P {
        &self.payload
    }

    pub fn into_parts(self) -> (&'static str, PartitionId, P) {
        (self.service_name, self.partition_id, self.payload)
    }
}

/// What an operation sees while running on its partition.
pub struct OperationContext<'a> {
    partition_id: PartitionId,
    service: &'a dyn ManagedService,
}

impl<'a> OperationContext<'a> {
    pub fn new(partition_id: PartitionId, service: &'a dyn ManagedService) -> Self {
        Self {
            partition_id,
            service,
        }
    }

    pub fn partition_id(&self) -> PartitionId {
        self.partition_id
    }

    /// The owning service, downcast to the type the operation was written against.
    pub fn service<S: ManagedService>(&self) -> Result<&'a S, OperationFailure> {
        self.service.as_any().downcast_ref::<S>().ok_or_else(|| {
            OperationFailure::new(
                SERVICE_MISMATCH,
                format!(
                    "service '{}' cannot run this operation",
                    self.service.name()
                ),
            )
        })
    }
}

/// Pending result of a submitted operation.
///
/// Dropping an `Invocation` abandons the result only; the operation still runs.
#[derive(Debug)]
pub struct Invocation<T> {
    partition_id: PartitionId,
    receiver: oneshot::Receiver<Result<T, OperationFailure>>,
}

impl<T> Invocation<T> {
    pub(crate) fn new(
        partition_id: PartitionId,
        receiver: oneshot::Receiver<Result<T, OperationFailure>>,
    ) -> Self {
        Self {
            partition_id,
            receiver,
        }
    }

    pub fn partition_id(&self) -> PartitionId {
        self.partition_id
    }

    pub async fn join(self) -> Result<T, OperationFailure> {
        match self.receiver.await {
            Ok(result) => result,
            Err(_) => Err(OperationFailure::aborted(format!(
                "operation on partition {} did not complete",
                self.partition_id
            ))),
        }
    }
}
