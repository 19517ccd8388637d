//! Access Control Contract
//!
//! Message tasks derive a [`RequiredPermission`] from their decoded parameters before any
//! operation is built. Whether that permission is granted is decided by an external
//! [`PermissionEvaluator`]; this module only defines the descriptor and the call contract.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Family of distributed object the permission applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PermissionKind {
    ScheduledExecutor,
    Config,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Read,
    Modify,
    Create,
    Destroy,
}

impl Action {
    /// Writes are authorised as modifications.
    pub const WRITE: Action = Action::Modify;

    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Read => "read",
            Action::Modify => "modify",
            Action::Create => "create",
            Action::Destroy => "destroy",
        }
    }
}

/// The `(action, resource)` pair a request must be authorised for.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RequiredPermission {
    pub kind: PermissionKind,
    pub action: Action,
    pub resource_name: String,
}

impl RequiredPermission {
    pub fn new(kind: PermissionKind, action: Action, resource_name: impl Into<String>) -> Self {
        Self {
            kind,
            action,
            resource_name: resource_name.into(),
        }
    }

    pub fn scheduled_executor(action: Action, scheduler_name: &str) -> Self {
        Self::new(PermissionKind::ScheduledExecutor, action, scheduler_name)
    }

    pub fn config(action: Action, config_name: &str) -> Self {
        Self::new(PermissionKind::Config, action, config_name)
    }
}

impl fmt::Display for RequiredPermission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:?}Permission({}, {})",
            self.kind,
            self.resource_name,
            self.action.as_str()
        )
    }
}

/// Decides whether the current client holds a permission.
pub trait PermissionEvaluator: Send + Sync {
    fn is_granted(&self, permission: &RequiredPermission) -> bool;
}

/// Evaluator used when security is disabled.
#[derive(Debug, Clone, Copy, Default)]
pub struct AllowAll;

impl PermissionEvaluator for AllowAll {
    fn is_granted(&self, _permission: &RequiredPermission) -> bool {
        true
    }
}

impl<F> PermissionEvaluator for F
where
    F: Fn(&RequiredPermission) -> bool + Send + Sync,
{
    fn is_granted(&self, permission: &RequiredPermission) -> bool {
        self(permission)
    }
}
