//! Partition-Routed Task
//!
//! Every client request goes through the same four steps:
//!
//! 1. **decode** the payload into an immutable parameter struct (`MalformedRequest`);
//! 2. **authorize** the permission derived from those parameters (`AccessDenied`);
//! 3. **prepare** an operation bound to the owning partition (`RoutingFailure`);
//! 4. **invoke** it on the dispatcher and **encode** the result or the domain failure.
//!
//! Steps 1–3 only look at the request, so a request that fails any of them never reaches
//! partition state. What differs between message types is captured by a
//! [`MessageTaskDef`]; [`PartitionTask`] runs the steps for any of them.

use super::context::TaskContext;
use crate::partition::{self, Operation, PartitionId, PartitionManager, PartitionOperation};
use crate::protocol::{ClientMessage, ClientResponse, TaskError};
use crate::security::{PermissionEvaluator, RequiredPermission};
use crate::versioning::Version;
use crate::wire::{WireReader, WireWriter};

use bytes::Bytes;
use std::fmt;
use std::future::Future;
use std::marker::PhantomData;
use std::pin::Pin;

/// Output type of the operation `T` prepares.
pub type OutputOf<T> = <<T as MessageTaskDef>::Operation as PartitionOperation>::Output;

/// The per-message-type strategy set.
pub trait MessageTaskDef: Send + Sync + 'static {
    type Params: fmt::Debug + Send + Sync;
    type Operation: PartitionOperation;

    const MESSAGE_TYPE: u16;
    /// Service that owns the target object's partition state.
    const SERVICE_NAME: &'static str;
    /// Stable label for audit logs and metrics.
    const OPERATION_NAME: &'static str;
    /// `true` for tasks that address a partition directly, so a pinned partition wins over
    /// the object name. Name-addressed tasks refuse a pin the name does not hash to.
    const PARTITION_PINNED: bool = false;

    /// Reads the parameters. `version` is the stream's negotiated version, for payloads
    /// that embed versioned records.
    fn decode(input: &mut WireReader, version: Version) -> Result<Self::Params, TaskError>;

    fn required_permission(params: &Self::Params) -> RequiredPermission;

    fn distributed_object_name(params: &Self::Params) -> &str;

    fn prepare_operation(params: &Self::Params, partition_id: PartitionId) -> Self::Operation;

    fn encode_response(output: OutputOf<Self>, out: &mut WireWriter, version: Version);
}

/// Type-erased message task, as stored in the registry.
pub trait MessageTask: Send + Sync {
    fn message_type(&self) -> u16;

    fn service_name(&self) -> &'static str;

    fn operation_name(&self) -> &'static str;

    fn process<'a>(
        &'a self,
        message: ClientMessage,
        version: Version,
        ctx: &'a TaskContext,
    ) -> Pin<Box<dyn Future<Output = ClientResponse> + Send + 'a>>;
}

/// Runs the decode → authorize → route → invoke → encode pipeline for `T`.
pub struct PartitionTask<T> {
    _def: PhantomData<fn() -> T>,
}

impl<T: MessageTaskDef> PartitionTask<T> {
    pub fn new() -> Self {
        Self { _def: PhantomData }
    }

    /// Step 1. The payload must be consumed exactly.
    pub fn decode(message: &ClientMessage, version: Version) -> Result<T::Params, TaskError> {
        let mut input = message.payload_reader();
        let params = T::decode(&mut input, version)?;
        input.finish()?;
        Ok(params)
    }

    /// Step 2.
    pub fn authorize(
        params: &T::Params,
        security: &dyn PermissionEvaluator,
    ) -> Result<RequiredPermission, TaskError> {
        let permission = T::required_permission(params);
        if security.is_granted(&permission) {
            Ok(permission)
        } else {
            Err(TaskError::AccessDenied(permission))
        }
    }

    /// Picks the partition the operation runs on.
    ///
    /// A pinned partition must be in range. For partition-pinned tasks it wins over the
    /// name-derived one; for name-addressed tasks it must agree with it.
    pub fn resolve_partition(
        pinned: Option<PartitionId>,
        params: &T::Params,
        partitioner: &PartitionManager,
    ) -> Result<PartitionId, TaskError> {
        let name = T::distributed_object_name(params);

        let Some(partition) = pinned else {
            return Ok(partitioner.get_partition(name));
        };
        if !partitioner.contains(partition) {
            return Err(partition::RoutingError::PartitionOutOfRange {
                partition,
                partition_count: partitioner.partition_count(),
            }
            .into());
        }
        if T::PARTITION_PINNED {
            return Ok(partition);
        }

        let owner = partitioner.get_partition(name);
        if owner != partition {
            return Err(partition::RoutingError::PartitionMismatch {
                name: name.to_string(),
                partition,
                owner,
            }
            .into());
        }
        Ok(owner)
    }

    /// Step 3.
    pub fn prepare(
        message: &ClientMessage,
        params: &T::Params,
        partitioner: &PartitionManager,
    ) -> Result<Operation<T::Operation>, TaskError> {
        let partition_id = Self::resolve_partition(message.partition_id, params, partitioner)?;
        Ok(Operation::new(
            T::SERVICE_NAME,
            partition_id,
            T::prepare_operation(params, partition_id),
        ))
    }

    /// All steps; the success payload or the first failure.
    pub async fn execute(
        message: &ClientMessage,
        version: Version,
        ctx: &TaskContext,
    ) -> Result<Bytes, TaskError> {
        let params = Self::decode(message, version)?;
        Self::authorize(&params, &*ctx.security)?;
        let operation = Self::prepare(message, &params, &ctx.partitioner)?;

        tracing::debug!(
            "Dispatching {} on '{}' to partition {} (correlation {})",
            T::OPERATION_NAME,
            T::distributed_object_name(&params),
            operation.partition_id(),
            message.correlation_id
        );

        let invocation = partition::invoke(&*ctx.dispatcher, operation)?;
        let output = invocation.join().await?;

        let mut out = WireWriter::new();
        T::encode_response(output, &mut out, version);
        Ok(out.freeze())
    }
}

impl<T: MessageTaskDef> Default for PartitionTask<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: MessageTaskDef> MessageTask for PartitionTask<T> {
    fn message_type(&self) -> u16 {
        T::MESSAGE_TYPE
    }

    fn service_name(&self) -> &'static str {
        T::SERVICE_NAME
    }

    fn operation_name(&self) -> &'static str {
        T::OPERATION_NAME
    }

    fn process<'a>(
        &'a self,
        message: ClientMessage,
        version: Version,
        ctx: &'a TaskContext,
    ) -> Pin<Box<dyn Future<Output = ClientResponse> + Send + 'a>> {
        Box::pin(async move {
            let correlation_id = message.correlation_id;

            match Self::execute(&message, version, ctx).await {
                Ok(payload) => ClientResponse::Success {
                    correlation_id,
                    message_type: T::MESSAGE_TYPE,
                    payload,
                },
                Err(err) => {
                    match &err {
                        TaskError::AccessDenied(permission) => tracing::info!(
                            "{} denied (correlation {}): missing {}",
                            T::OPERATION_NAME,
                            correlation_id,
                            permission
                        ),
                        TaskError::OperationFailure(failure) => tracing::warn!(
                            "{} failed (correlation {}): {}",
                            T::OPERATION_NAME,
                            correlation_id,
                            failure
                        ),
                        other => tracing::debug!(
                            "{} rejected (correlation {}): {}",
                            T::OPERATION_NAME,
                            correlation_id,
                            other
                        ),
                    }
                    err.into_response(correlation_id)
                }
            }
        })
    }
}
