//! Runtime configuration for a scaffolded service.

use crate::authz::{GetPermission, DEFAULT_PERMISSION_PREFIX};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
pub const DEFAULT_BODY_LIMIT: usize = 1024 * 1024;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AppConfig {
    pub bind_addr: String,
    /// Prepended to every permission name to form the policy evaluated per request.
    pub permission_prefix: String,
    pub get_permission: GetPermission,
    /// Maximum request body size in bytes.
    pub body_limit: usize,
    /// JSON policy file (`{ "roles": { ... } }`). No file means no grants.
    #[serde(default)]
    pub policy_path: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            permission_prefix: DEFAULT_PERMISSION_PREFIX.to_string(),
            get_permission: GetPermission::default(),
            body_limit: DEFAULT_BODY_LIMIT,
            policy_path: None,
        }
    }
}
