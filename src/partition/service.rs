//! Service Registry
//!
//! Maps service names (e.g. "scheduled-executor") to the service instance that owns the
//! per-partition state for that kind of distributed object. Operations name their service;
//! the dispatcher resolves it here before queuing anything.

use dashmap::DashMap;
use std::any::Any;
use std::sync::Arc;

/// A service whose state is sharded by partition.
///
/// Implementations may only touch a partition's slice of state from inside an operation
/// running on that partition.
pub trait ManagedService: Send + Sync + 'static {
    /// Name operations use to address this service.
    fn name(&self) -> &'static str;

    /// Downcasting hook for `OperationContext::service`.
    fn as_any(&self) -> &dyn Any;
}

/// Registry holding every service of the node.
pub struct ServiceRegistry {
    services: DashMap<&'static str, Arc<dyn ManagedService>>,
}

impl ServiceRegistry {
    /// Creates a new, empty registry.
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Registers a service under its own name, replacing any previous instance.
    ///
    /// # Arguments
    /// * `service` - The service instance; its `name()` becomes the lookup key.
    pub fn register<S: ManagedService>(&self, service: Arc<S>) {
        let name = service.name();
        self.services.insert(name, service);
        tracing::info!("Registered service: {}", name);
    }

    /// Looks up a service by name.
    ///
    /// # Returns
    /// * `Some(service)` if one is registered under `name`.
    /// * `None` otherwise; the dispatcher reports this as an unknown service.
    pub fn get(&self, name: &str) -> Option<Arc<dyn ManagedService>> {
        self.services.get(name).map(|entry| entry.value().clone())
    }

    pub fn has_service(&self, name: &str) -> bool {
        self.services.contains_key(name)
    }

    /// Names of every registered service, in no particular order.
    pub fn list_services(&self) -> Vec<&'static str> {
        self.services.iter().map(|entry| *entry.key()).collect()
    }

    pub fn service_count(&self) -> usize {
        self.services.len()
    }
}

impl Default for ServiceRegistry {
    fn default() -> Self {
        Self {
            services: DashMap::new(),
        }
    }
}
