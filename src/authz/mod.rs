//! Permission gating: principals, policy names and the evaluator seam.

mod permissions;
mod policy;

pub use permissions::{CrudOperation, GetPermission, PermissionSet};
pub use policy::{PolicyFile, StaticPolicyEvaluator};

use crate::error::AppError;
use async_trait::async_trait;
use std::sync::Arc;

pub const DEFAULT_PERMISSION_PREFIX: &str = "Permissions.";

/// The caller a request runs on behalf of. Anonymous when no user id was supplied.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Principal {
    pub user_id: Option<String>,
    pub roles: Vec<String>,
}

impl Principal {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn user(user_id: impl Into<String>, roles: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Principal {
            user_id: Some(user_id.into()),
            roles: roles.into_iter().map(Into::into).collect(),
        }
    }

    pub fn is_anonymous(&self) -> bool {
        self.user_id.is_none()
    }

    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny,
}

impl Decision {
    pub fn is_allowed(self) -> bool {
        matches!(self, Decision::Allow)
    }
}

impl From<bool> for Decision {
    fn from(allowed: bool) -> Self {
        if allowed {
            Decision::Allow
        } else {
            Decision::Deny
        }
    }
}

/// Host authorization hook. Decides whether `principal` satisfies `policy`.
#[async_trait]
pub trait PermissionEvaluator: Send + Sync {
    async fn evaluate(&self, principal: &Principal, policy: &str) -> Decision;
}

/// Forms policy names from a fixed prefix and delegates the decision to the evaluator.
#[derive(Clone)]
pub struct Authorizer {
    evaluator: Arc<dyn PermissionEvaluator>,
    prefix: Arc<str>,
}

impl Authorizer {
    pub fn new(evaluator: Arc<dyn PermissionEvaluator>, prefix: impl Into<String>) -> Self {
        Authorizer {
            evaluator,
            prefix: Arc::from(prefix.into()),
        }
    }

    pub fn with_default_prefix(evaluator: Arc<dyn PermissionEvaluator>) -> Self {
        Self::new(evaluator, DEFAULT_PERMISSION_PREFIX)
    }

    pub fn policy_name(&self, permission: &str) -> String {
        format!("{}{}", self.prefix, permission)
    }

    /// Ok when allowed, `AppError::Forbidden` otherwise.
    pub async fn require(&self, principal: &Principal, permission: &str) -> Result<(), AppError> {
        let policy = self.policy_name(permission);
        match self.evaluator.evaluate(principal, &policy).await {
            Decision::Allow => Ok(()),
            Decision::Deny => {
                tracing::info!(
                    user = principal.user_id.as_deref().unwrap_or("anonymous"),
                    policy = %policy,
                    "permission denied"
                );
                Err(AppError::Forbidden { policy })
            }
        }
    }
}
