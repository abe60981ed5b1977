//! Load configuration from the environment (optionally seeded from `.env`) and the
//! policy table from a JSON file.

use crate::authz::{PolicyFile, StaticPolicyEvaluator};
use crate::config::{validate, AppConfig};
use crate::error::ConfigError;
use std::path::Path;

pub const ENV_BIND_ADDR: &str = "CRUD_BIND_ADDR";
pub const ENV_PERMISSION_PREFIX: &str = "CRUD_PERMISSION_PREFIX";
pub const ENV_GET_PERMISSION: &str = "CRUD_GET_PERMISSION";
pub const ENV_BODY_LIMIT: &str = "CRUD_BODY_LIMIT";
pub const ENV_POLICY_PATH: &str = "CRUD_POLICY_PATH";

impl AppConfig {
    /// Reads `.env` if present, then the process environment. Validated before returning.
    pub fn from_env() -> Result<Self, ConfigError> {
        if let Err(e) = dotenvy::dotenv() {
            if !e.not_found() {
                return Err(ConfigError::Load(format!(".env: {}", e)));
            }
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Unset or empty variables keep their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let mut config = AppConfig::default();
        if let Some(addr) = get(ENV_BIND_ADDR) {
            config.bind_addr = addr;
        }
        if let Some(prefix) = get(ENV_PERMISSION_PREFIX) {
            config.permission_prefix = prefix;
        }
        if let Some(get_permission) = get(ENV_GET_PERMISSION) {
            config.get_permission = get_permission.parse()?;
        }
        if let Some(limit) = get(ENV_BODY_LIMIT) {
            config.body_limit = limit
                .parse()
                .map_err(|_| ConfigError::Validation(format!("{} must be a byte count, got '{}'", ENV_BODY_LIMIT, limit)))?;
        }
        config.policy_path = get(ENV_POLICY_PATH).map(Into::into);
        validate(&config)?;
        Ok(config)
    }
}

/// Policy table from the configured file, or an empty table (deny everything) when none is set.
pub async fn load_policies(config: &AppConfig) -> Result<StaticPolicyEvaluator, ConfigError> {
    match &config.policy_path {
        Some(path) => load_policy_file(path).await,
        None => {
            tracing::warn!("no policy file configured; every permission check will be denied");
            Ok(StaticPolicyEvaluator::new())
        }
    }
}

pub async fn load_policy_file(path: &Path) -> Result<StaticPolicyEvaluator, ConfigError> {
    let raw = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| ConfigError::Load(format!("{}: {}", path.display(), e)))?;
    let file: PolicyFile =
        serde_json::from_str(&raw).map_err(|e| ConfigError::Load(format!("{}: {}", path.display(), e)))?;
    tracing::info!(path = %path.display(), roles = file.roles.len(), "loaded policy file");
    Ok(file.into())
}
