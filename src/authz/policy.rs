//! Role-based policy table: a static `PermissionEvaluator` for hosts without their own.

use super::{Decision, PermissionEvaluator, Principal};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// On-disk form: `{ "roles": { "editor": ["Permissions.Notes.*"] } }`.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct PolicyFile {
    #[serde(default)]
    pub roles: HashMap<String, Vec<String>>,
}

/// Grants policies per role. A grant matches exactly, as a `prefix.*` wildcard, or as `*`.
#[derive(Clone, Debug, Default)]
pub struct StaticPolicyEvaluator {
    grants: HashMap<String, Vec<String>>,
}

impl StaticPolicyEvaluator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn grant(mut self, role: impl Into<String>, policy: impl Into<String>) -> Self {
        self.grants.entry(role.into()).or_default().push(policy.into());
        self
    }

    pub fn roles(&self) -> impl Iterator<Item = &str> {
        self.grants.keys().map(String::as_str)
    }

    fn allows(&self, principal: &Principal, policy: &str) -> bool {
        principal
            .roles
            .iter()
            .filter_map(|role| self.grants.get(role))
            .flatten()
            .any(|grant| grant_matches(grant, policy))
    }
}

impl From<PolicyFile> for StaticPolicyEvaluator {
    fn from(file: PolicyFile) -> Self {
        StaticPolicyEvaluator { grants: file.roles }
    }
}

fn grant_matches(grant: &str, policy: &str) -> bool {
    if grant == "*" || grant == policy {
        return true;
    }
    match grant.strip_suffix('*') {
        Some(prefix) if prefix.ends_with('.') => policy.starts_with(prefix),
        _ => false,
    }
}

#[async_trait]
impl PermissionEvaluator for StaticPolicyEvaluator {
    async fn evaluate(&self, principal: &Principal, policy: &str) -> Decision {
        self.allows(principal, policy).into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grant_matching() {
        assert!(grant_matches("*", "Permissions.Notes.View"));
        assert!(grant_matches("Permissions.Notes.View", "Permissions.Notes.View"));
        assert!(grant_matches("Permissions.Notes.*", "Permissions.Notes.Delete"));
        assert!(!grant_matches("Permissions.Notes.*", "Permissions.NotesArchive.View"));
        assert!(!grant_matches("Permissions.Note*", "Permissions.Notes.View"));
    }

    #[tokio::test]
    async fn evaluates_by_role() {
        let evaluator = StaticPolicyEvaluator::new()
            .grant("reader", "Permissions.Notes.View")
            .grant("editor", "Permissions.Notes.*");

        let reader = Principal::user("r", ["reader"]);
        let editor = Principal::user("e", ["editor"]);

        assert_eq!(evaluator.evaluate(&reader, "Permissions.Notes.View").await, Decision::Allow);
        assert_eq!(evaluator.evaluate(&reader, "Permissions.Notes.Edit").await, Decision::Deny);
        assert_eq!(evaluator.evaluate(&editor, "Permissions.Notes.Edit").await, Decision::Allow);
        assert_eq!(
            evaluator.evaluate(&Principal::anonymous(), "Permissions.Notes.View").await,
            Decision::Deny
        );
    }

    #[test]
    fn loads_from_policy_file_json() {
        let file: PolicyFile =
            serde_json::from_str(r#"{"roles":{"admin":["*"],"reader":["Permissions.Notes.View"]}}"#).unwrap();
        let evaluator = StaticPolicyEvaluator::from(file);
        let mut roles: Vec<_> = evaluator.roles().collect();
        roles.sort();
        assert_eq!(roles, vec!["admin", "reader"]);
    }
}
