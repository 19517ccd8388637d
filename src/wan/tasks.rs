//! WAN Replication Message Tasks
//!
//! Both requests embed a `WanConsumerConfig` encoded at the stream's negotiated version, so
//! a 3.10 client neither sends nor receives the persistence flag.

use super::operations::*;
use super::service::SERVICE_NAME;
use crate::config::WanConsumerConfig;
use crate::partition::PartitionId;
use crate::protocol::TaskError;
use crate::security::{Action, RequiredPermission};
use crate::task::MessageTaskDef;
use crate::versioning::{Version, read_record, write_record};
use crate::wire::{WireReader, WireWriter};

pub const ADD_WAN_CONSUMER_CONFIG: u16 = 0x2001;
pub const GET_WAN_CONSUMER_CONFIG: u16 = 0x2002;

#[derive(Debug, Clone, PartialEq)]
pub struct AddConsumerParams {
    pub wan_replication_name: String,
    pub config: WanConsumerConfig,
}

impl AddConsumerParams {
    pub fn encode(&self, out: &mut WireWriter, version: Version) {
        out.write_string(&self.wan_replication_name);
        write_record(&self.config, version, out);
    }
}

pub struct AddWanConsumerConfigTask;

impl MessageTaskDef for AddWanConsumerConfigTask {
    type Params = AddConsumerParams;
    type Operation = AddWanConsumerConfigOperation;

    const MESSAGE_TYPE: u16 = ADD_WAN_CONSUMER_CONFIG;
    const SERVICE_NAME: &'static str = SERVICE_NAME;
    const OPERATION_NAME: &'static str = "addWanConsumerConfig";

    fn decode(input: &mut WireReader, version: Version) -> Result<AddConsumerParams, TaskError> {
        let wan_replication_name = input.read_string()?;
        let config = read_record::<WanConsumerConfig>(input, version)?;
        Ok(AddConsumerParams {
            wan_replication_name,
            config,
        })
    }

    fn required_permission(params: &AddConsumerParams) -> RequiredPermission {
        RequiredPermission::config(Action::Create, &params.wan_replication_name)
    }

    fn distributed_object_name(params: &AddConsumerParams) -> &str {
        &params.wan_replication_name
    }

    fn prepare_operation(
        params: &AddConsumerParams,
        _partition_id: PartitionId,
    ) -> AddWanConsumerConfigOperation {
        AddWanConsumerConfigOperation {
            wan_replication_name: params.wan_replication_name.clone(),
            config: params.config.clone(),
        }
    }

    fn encode_response(_output: (), _out: &mut WireWriter, _version: Version) {}
}

pub struct GetWanConsumerConfigTask;

impl MessageTaskDef for GetWanConsumerConfigTask {
    type Params = String;
    type Operation = GetWanConsumerConfigOperation;

    const MESSAGE_TYPE: u16 = GET_WAN_CONSUMER_CONFIG;
    const SERVICE_NAME: &'static str = SERVICE_NAME;
    const OPERATION_NAME: &'static str = "getWanConsumerConfig";

    fn decode(input: &mut WireReader, _version: Version) -> Result<String, TaskError> {
        Ok(input.read_string()?)
    }

    fn required_permission(wan_replication_name: &String) -> RequiredPermission {
        RequiredPermission::config(Action::Read, wan_replication_name)
    }

    fn distributed_object_name(wan_replication_name: &String) -> &str {
        wan_replication_name
    }

    fn prepare_operation(
        wan_replication_name: &String,
        _partition_id: PartitionId,
    ) -> GetWanConsumerConfigOperation {
        GetWanConsumerConfigOperation {
            wan_replication_name: wan_replication_name.clone(),
        }
    }

    fn encode_response(config: Option<WanConsumerConfig>, out: &mut WireWriter, version: Version) {
        out.write_bool(config.is_some());
        if let Some(config) = config {
            write_record(&config, version, out);
        }
    }
}
