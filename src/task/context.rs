use crate::partition::{OperationDispatcher, PartitionManager};
use crate::security::{AllowAll, PermissionEvaluator};

use std::sync::Arc;

/// Node collaborators a message task needs while processing a request.
#[derive(Clone)]
pub struct TaskContext {
    pub partitioner: Arc<PartitionManager>,
    pub dispatcher: Arc<dyn OperationDispatcher>,
    pub security: Arc<dyn PermissionEvaluator>,
}

impl TaskContext {
    pub fn new(
        partitioner: Arc<PartitionManager>,
        dispatcher: Arc<dyn OperationDispatcher>,
        security: Arc<dyn PermissionEvaluator>,
    ) -> Self {
        Self {
            partitioner,
            dispatcher,
            security,
        }
    }

    /// Context with security disabled.
    pub fn unsecured(
        partitioner: Arc<PartitionManager>,
        dispatcher: Arc<dyn OperationDispatcher>,
    ) -> Self {
        Self::new(partitioner, dispatcher, Arc::new(AllowAll))
    }
}
