use super::service::WanReplicationService;
use crate::config::WanConsumerConfig;
use crate::partition::{OperationContext, OperationFailure, PartitionOperation};

#[derive(Debug)]
pub struct AddWanConsumerConfigOperation {
    pub wan_replication_name: String,
    pub config: WanConsumerConfig,
}

impl PartitionOperation for AddWanConsumerConfigOperation {
    type Output = ();

    fn run(self, ctx: &OperationContext<'_>) -> Result<(), OperationFailure> {
        let service = ctx.service::<WanReplicationService>()?;
        service.add_consumer_config(ctx.partition_id(), &self.wan_replication_name, self.config);
        Ok(())
    }
}

#[derive(Debug)]
pub struct GetWanConsumerConfigOperation {
    pub wan_replication_name: String,
}

impl PartitionOperation for GetWanConsumerConfigOperation {
    type Output = Option<WanConsumerConfig>;

    fn run(self, ctx: &OperationContext<'_>) -> Result<Self::Output, OperationFailure> {
        let service = ctx.service::<WanReplicationService>()?;
        Ok(service.get_consumer_config(ctx.partition_id(), &self.wan_replication_name))
    }
}
