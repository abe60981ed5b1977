//! Explicit registration table: each resource is registered with its path segment,
//! service and permissions, then merged into one router.

use crate::authz::{Authorizer, GetPermission, PermissionSet};
use crate::controller::CrudController;
use crate::error::ConfigError;
use crate::model::Resource;
use crate::routes::crud_routes;
use crate::service::SharedService;
use axum::Router;

pub struct CrudRegistry {
    authorizer: Authorizer,
    get_permission: GetPermission,
    segments: Vec<String>,
    router: Router,
}

impl CrudRegistry {
    pub fn new(authorizer: Authorizer) -> Self {
        CrudRegistry {
            authorizer,
            get_permission: GetPermission::default(),
            segments: Vec::new(),
            router: Router::new(),
        }
    }

    /// Applied to every resource registered afterwards.
    pub fn get_permission(mut self, get: GetPermission) -> Self {
        self.get_permission = get;
        self
    }

    pub fn register<M: Resource>(
        mut self,
        segment: &str,
        service: SharedService<M>,
        permissions: PermissionSet,
    ) -> Result<Self, ConfigError> {
        validate_segment(segment)?;
        if self.segments.iter().any(|s| s == segment) {
            return Err(ConfigError::DuplicatePathSegment(segment.to_string()));
        }
        let permissions = permissions.with_get_permission(self.get_permission);
        tracing::debug!(
            segment,
            view = %permissions.view,
            create = %permissions.create,
            edit = %permissions.edit,
            delete = %permissions.delete,
            "registered resource"
        );
        let controller = CrudController::new(service, self.authorizer.clone(), permissions);
        self.router = self.router.merge(crud_routes(segment, controller));
        self.segments.push(segment.to_string());
        Ok(self)
    }

    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().map(String::as_str)
    }

    pub fn into_router(self) -> Router {
        self.router
    }
}

/// Segments are single, non-empty path components of `[A-Za-z0-9_-]`.
fn validate_segment(segment: &str) -> Result<(), ConfigError> {
    let valid = !segment.is_empty()
        && segment
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if valid {
        Ok(())
    } else {
        Err(ConfigError::InvalidPathSegment(segment.to_string()))
    }
}
