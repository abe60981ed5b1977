//! Per-resource permission names.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CrudOperation {
    List,
    Get,
    Create,
    Update,
    Delete,
}

impl CrudOperation {
    pub fn as_str(self) -> &'static str {
        match self {
            CrudOperation::List => "list",
            CrudOperation::Get => "get",
            CrudOperation::Create => "create",
            CrudOperation::Update => "update",
            CrudOperation::Delete => "delete",
        }
    }
}

impl fmt::Display for CrudOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which permission guards single-entity reads.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GetPermission {
    #[default]
    View,
    /// Legacy behavior: reads require the edit permission.
    Edit,
}

impl FromStr for GetPermission {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "view" => Ok(GetPermission::View),
            "edit" => Ok(GetPermission::Edit),
            _ => Err(ConfigError::Validation(format!(
                "invalid get permission: {} (expected view or edit)",
                s
            ))),
        }
    }
}

/// Permission names (without prefix) for one resource.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PermissionSet {
    pub view: String,
    pub create: String,
    pub edit: String,
    pub delete: String,
    pub get: GetPermission,
}

impl PermissionSet {
    /// `Notes` -> `Notes.View`, `Notes.Create`, `Notes.Edit`, `Notes.Delete`.
    pub fn for_resource(name: &str) -> Self {
        PermissionSet {
            view: format!("{name}.View"),
            create: format!("{name}.Create"),
            edit: format!("{name}.Edit"),
            delete: format!("{name}.Delete"),
            get: GetPermission::default(),
        }
    }

    pub fn with_get_permission(mut self, get: GetPermission) -> Self {
        self.get = get;
        self
    }

    pub fn for_operation(&self, op: CrudOperation) -> &str {
        match op {
            CrudOperation::List => &self.view,
            CrudOperation::Get => match self.get {
                GetPermission::View => &self.view,
                GetPermission::Edit => &self.edit,
            },
            CrudOperation::Create => &self.create,
            CrudOperation::Update => &self.edit,
            CrudOperation::Delete => &self.delete,
        }
    }
}
